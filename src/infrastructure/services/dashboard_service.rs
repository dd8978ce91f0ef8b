//! Dashboard service - the prediction pipeline behind the page
//!
//! A run acquires a session, loads the configured model from the registry,
//! scores the source table, filters the predictions to the target month
//! and hands the result to a presenter. Stages run strictly in order and
//! nothing is presented unless every earlier stage succeeded.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::domain::chart::{ChartOptions, ChartSpec, FieldDef, FieldType, LegendOrient};
use crate::domain::dashboard::{DashboardSettings, FilterMode};
use crate::domain::model::{ModelSummary, PredictiveModel};
use crate::domain::presentation::{Page, Presenter};
use crate::domain::registry::Registry;
use crate::domain::relation::{col, month, LocalTable, Value};
use crate::domain::session::{Session, SessionProvider};
use crate::domain::DomainError;
use crate::infrastructure::presentation::HtmlPresenter;

/// Column holding the record date
pub const DATE_COLUMN: &str = "date";

const SITE_FIELD: &str = "SITE";
const TYPE_FIELD: &str = "TYPE";
const VALUE_FIELD: &str = "VALUE";

/// Trait for the dashboard service (for dynamic dispatch in AppState)
#[async_trait]
pub trait DashboardServiceTrait: Send + Sync + fmt::Debug {
    fn settings(&self) -> &DashboardSettings;

    /// Run the pipeline and collect the resulting page
    async fn render_page(&self) -> Result<Page, DomainError>;

    /// Run the pipeline and return the sized chart spec only
    async fn prediction_chart(&self) -> Result<ChartSpec, DomainError>;

    /// Models registered in the configured namespace
    async fn list_models(&self) -> Result<Vec<ModelSummary>, DomainError>;

    /// Verify a session can be opened and the registry reached
    async fn check_ready(&self) -> Result<(), DomainError>;
}

/// Point the session at the configured namespace and bind a registry to it
async fn open_registry(
    session: &Arc<dyn Session>,
    settings: &DashboardSettings,
) -> Result<Registry, DomainError> {
    session.use_database(&settings.namespace.database).await?;
    session.use_schema(&settings.namespace.schema).await?;
    Registry::new(Arc::clone(session))
}

/// Fetch the configured model
pub async fn load_model(
    session: &Arc<dyn Session>,
    settings: &DashboardSettings,
) -> Result<Arc<dyn PredictiveModel>, DomainError> {
    let registry = open_registry(session, settings).await?;
    let model = registry.get_model(&settings.model_name).await?;

    info!(
        namespace = %registry.namespace(),
        model = %model.name(),
        version = %model.version(),
        "Loaded model"
    );

    Ok(model)
}

/// Score the source table and materialize the predictions
///
/// The month filter is always built, so a source without a date column
/// fails here whichever filter mode is configured.
pub async fn run_inference(
    session: &Arc<dyn Session>,
    model: &dyn PredictiveModel,
    settings: &DashboardSettings,
) -> Result<LocalTable, DomainError> {
    let source = session.table(&settings.source_table).await?;
    let predictions = model.run(&source, &settings.inference_function).await?;

    debug!(
        relation = %predictions.name(),
        function = %settings.inference_function,
        columns = ?predictions.schema().columns(),
        "Built prediction relation"
    );

    let target = Value::from(settings.target_month.get());
    let in_target_month = predictions.filter(month(col(DATE_COLUMN)).equals(target))?;

    let selected = match settings.filter_mode {
        FilterMode::Applied => &in_target_month,
        FilterMode::Discarded => &predictions,
    };

    let table = selected.to_local_table()?;

    info!(
        rows = table.num_rows(),
        target_month = %settings.target_month,
        filter_mode = %settings.filter_mode,
        "Materialized predictions"
    );

    Ok(table)
}

/// Grouped bar chart of predicted values per site and type
pub fn build_prediction_chart(table: &LocalTable) -> Result<ChartSpec, DomainError> {
    let chart = ChartSpec::bar(table)
        .x(FieldDef::new(SITE_FIELD, FieldType::Nominal).sort("-y"))
        .x_offset(FieldDef::new(TYPE_FIELD, FieldType::Nominal))
        .y(FieldDef::new(VALUE_FIELD, FieldType::Quantitative))
        .color(FieldDef::new(TYPE_FIELD, FieldType::Nominal).legend(LegendOrient::Left))
        .interactive();

    chart.check_fields(table)?;
    Ok(chart)
}

/// Dashboard service over a session provider
pub struct DashboardService {
    provider: Arc<dyn SessionProvider>,
    settings: DashboardSettings,
}

impl fmt::Debug for DashboardService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DashboardService")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl DashboardService {
    pub fn new(provider: Arc<dyn SessionProvider>, settings: DashboardSettings) -> Self {
        Self { provider, settings }
    }

    async fn predictions(&self) -> Result<LocalTable, DomainError> {
        let session = self.provider.active_session().await?;
        debug!(session = %session.id(), "Acquired session");

        let model = load_model(&session, &self.settings).await?;
        run_inference(&session, model.as_ref(), &self.settings).await
    }

    /// Run the full pipeline against `presenter`
    #[instrument(skip_all, fields(run_id = %Uuid::new_v4()))]
    pub async fn run(&self, presenter: &mut dyn Presenter) -> Result<(), DomainError> {
        let table = self.predictions().await?;
        let chart = build_prediction_chart(&table)?;

        let text = &self.settings.text;
        presenter.title(&text.title);
        presenter.write(&text.description);
        presenter.markdown(&text.markdown());
        presenter.render_chart(&chart, &ChartOptions::default())?;

        info!(rows = table.num_rows(), "Dashboard rendered");
        Ok(())
    }
}

#[async_trait]
impl DashboardServiceTrait for DashboardService {
    fn settings(&self) -> &DashboardSettings {
        &self.settings
    }

    async fn render_page(&self) -> Result<Page, DomainError> {
        let mut presenter = HtmlPresenter::new();
        self.run(&mut presenter).await?;
        Ok(presenter.into_page())
    }

    async fn prediction_chart(&self) -> Result<ChartSpec, DomainError> {
        let table = self.predictions().await?;
        let chart = build_prediction_chart(&table)?;
        Ok(ChartOptions::default().apply(&chart))
    }

    async fn list_models(&self) -> Result<Vec<ModelSummary>, DomainError> {
        let session = self.provider.active_session().await?;
        open_registry(&session, &self.settings)
            .await?
            .list_models()
            .await
    }

    async fn check_ready(&self) -> Result<(), DomainError> {
        self.list_models().await.map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use mockall::Sequence;

    use crate::domain::chart::CONTAINER_WIDTH;
    use crate::domain::dashboard::{PageText, TargetMonth};
    use crate::domain::model::{ModelName, ModelVersion};
    use crate::domain::presentation::{MockPresenter, PageElement};
    use crate::domain::registry::MockModelRegistry;
    use crate::domain::relation::Schema;
    use crate::domain::session::mock::{RecordingSession, SessionCall, StaticSessionProvider};
    use crate::domain::session::{Identifier, Namespace};
    use crate::infrastructure::model::{LinearModel, LinearModelSpec};

    fn namespace() -> Namespace {
        Namespace::new(
            Identifier::new("ml_database").unwrap(),
            Identifier::new("ml_schema").unwrap(),
        )
    }

    fn settings(filter_mode: FilterMode) -> DashboardSettings {
        DashboardSettings {
            namespace: namespace(),
            model_name: ModelName::new("CATEGORY_1_MODEL").unwrap(),
            inference_function: "predict".to_string(),
            source_table: Identifier::new("raw_data").unwrap(),
            target_month: TargetMonth::new(1).unwrap(),
            filter_mode,
            text: PageText {
                title: "Predictions".to_string(),
                description: "Proof of concept Machine Learning app to predict categories."
                    .to_string(),
                heading: "January 2024".to_string(),
                subheading: "Category 1 Predictions".to_string(),
            },
        }
    }

    fn date(month: u32, day: u32) -> Value {
        Value::from(NaiveDate::from_ymd_opt(2024, month, day).unwrap())
    }

    fn raw_data() -> LocalTable {
        LocalTable::new(
            Schema::new(["date", "SITE", "TYPE", "UNITS"]).unwrap(),
            vec![
                vec![date(1, 5), Value::from("S1"), Value::from("A"), Value::Int(10)],
                vec![date(1, 20), Value::from("S2"), Value::from("B"), Value::Int(4)],
                vec![date(2, 3), Value::from("S1"), Value::from("A"), Value::Int(7)],
            ],
        )
        .unwrap()
    }

    fn model() -> Arc<dyn PredictiveModel> {
        Arc::new(
            LinearModel::new(
                ModelName::new("CATEGORY_1_MODEL").unwrap(),
                ModelVersion::new("V1").unwrap(),
                LinearModelSpec::new(vec!["UNITS".to_string()], vec![2.0], 0.0),
            )
            .unwrap(),
        )
    }

    fn registry_with_model() -> MockModelRegistry {
        let model = model();
        let mut registry = MockModelRegistry::new();
        registry
            .expect_get_model()
            .withf(|ns, name| ns == &namespace() && name.as_str() == "CATEGORY_1_MODEL")
            .times(1)
            .returning(move |_, _| Ok(Some(Arc::clone(&model))));
        registry
    }

    fn service(session: Arc<RecordingSession>, filter_mode: FilterMode) -> DashboardService {
        DashboardService::new(
            Arc::new(StaticSessionProvider::new(session)),
            settings(filter_mode),
        )
    }

    fn values(table: &LocalTable) -> Vec<Value> {
        table
            .column(VALUE_FIELD)
            .unwrap()
            .into_iter()
            .cloned()
            .collect()
    }

    #[tokio::test]
    async fn test_model_loaded_once_after_namespace_is_set() {
        let session = Arc::new(
            RecordingSession::new(Arc::new(registry_with_model())).with_table("raw_data", raw_data()),
        );
        let service = service(Arc::clone(&session), FilterMode::Applied);

        service.render_page().await.unwrap();

        assert_eq!(
            session.calls(),
            vec![
                SessionCall::UseDatabase(Identifier::new("ML_DATABASE").unwrap()),
                SessionCall::UseSchema(Identifier::new("ML_SCHEMA").unwrap()),
                SessionCall::Table(Identifier::new("RAW_DATA").unwrap()),
            ]
        );
    }

    #[tokio::test]
    async fn test_applied_filter_keeps_target_month() {
        let session = Arc::new(
            RecordingSession::new(Arc::new(registry_with_model())).with_table("raw_data", raw_data()),
        );
        let session: Arc<dyn Session> = session;
        let settings = settings(FilterMode::Applied);

        let model = load_model(&session, &settings).await.unwrap();
        let table = run_inference(&session, model.as_ref(), &settings)
            .await
            .unwrap();

        assert_eq!(table.num_rows(), 2);
        assert_eq!(values(&table), vec![Value::Float(20.0), Value::Float(8.0)]);
    }

    #[tokio::test]
    async fn test_discarded_filter_keeps_all_predictions() {
        let session = Arc::new(
            RecordingSession::new(Arc::new(registry_with_model())).with_table("raw_data", raw_data()),
        );
        let session: Arc<dyn Session> = session;
        let settings = settings(FilterMode::Discarded);

        let model = load_model(&session, &settings).await.unwrap();
        let table = run_inference(&session, model.as_ref(), &settings)
            .await
            .unwrap();

        assert_eq!(table.num_rows(), 3);
        assert_eq!(
            values(&table),
            vec![Value::Float(20.0), Value::Float(8.0), Value::Float(14.0)]
        );
    }

    #[tokio::test]
    async fn test_presenter_receives_elements_in_order() {
        let session = Arc::new(
            RecordingSession::new(Arc::new(registry_with_model())).with_table("raw_data", raw_data()),
        );
        let service = service(session, FilterMode::Applied);

        let mut seq = Sequence::new();
        let mut presenter = MockPresenter::new();
        presenter
            .expect_title()
            .withf(|text| text == "Predictions")
            .times(1)
            .in_sequence(&mut seq)
            .return_const(());
        presenter
            .expect_write()
            .withf(|text| text.starts_with("Proof of concept"))
            .times(1)
            .in_sequence(&mut seq)
            .return_const(());
        presenter
            .expect_markdown()
            .withf(|text| text == "# January 2024\n## Category 1 Predictions\n")
            .times(1)
            .in_sequence(&mut seq)
            .return_const(());
        presenter
            .expect_render_chart()
            .withf(|spec, options| {
                spec.data.values.len() == 2
                    && options.theme.is_none()
                    && options.use_container_width
            })
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(()));

        service.run(&mut presenter).await.unwrap();
    }

    #[tokio::test]
    async fn test_chart_encodings() {
        let session = Arc::new(
            RecordingSession::new(Arc::new(registry_with_model())).with_table("raw_data", raw_data()),
        );
        let service = service(session, FilterMode::Applied);

        let chart = service.prediction_chart().await.unwrap();
        let encoding = &chart.encoding;

        let x = encoding.x.as_ref().unwrap();
        assert_eq!(x.field, "SITE");
        assert_eq!(x.field_type, FieldType::Nominal);
        assert_eq!(x.sort.as_deref(), Some("-y"));

        let x_offset = encoding.x_offset.as_ref().unwrap();
        assert_eq!(x_offset.field, "TYPE");
        assert_eq!(x_offset.field_type, FieldType::Nominal);

        let y = encoding.y.as_ref().unwrap();
        assert_eq!(y.field, "VALUE");
        assert_eq!(y.field_type, FieldType::Quantitative);

        let color = encoding.color.as_ref().unwrap();
        assert_eq!(color.field, "TYPE");
        assert_eq!(color.legend.as_ref().unwrap().orient, LegendOrient::Left);

        assert!(chart.is_interactive());
        assert_eq!(chart.width.as_deref(), Some(CONTAINER_WIDTH));
    }

    #[test]
    fn test_chart_rejects_case_mismatched_columns() {
        let predictions = LocalTable::new(
            Schema::new(["site", "type", "value"]).unwrap(),
            vec![vec![Value::from("S1"), Value::from("A"), Value::Float(2.0)]],
        )
        .unwrap();

        let err = build_prediction_chart(&predictions).unwrap_err();
        assert!(matches!(err, DomainError::MissingColumn { ref column, .. } if column == "SITE"));
    }

    #[tokio::test]
    async fn test_missing_model_never_reaches_presenter() {
        let mut registry = MockModelRegistry::new();
        registry
            .expect_get_model()
            .times(1)
            .returning(|_, _| Ok(None));

        let session = Arc::new(
            RecordingSession::new(Arc::new(registry)).with_table("raw_data", raw_data()),
        );
        let service = service(Arc::clone(&session), FilterMode::Applied);

        // any call on a mock without expectations panics
        let mut presenter = MockPresenter::new();
        let err = service.run(&mut presenter).await.unwrap_err();

        assert!(matches!(err, DomainError::NotFound { .. }));
        assert!(!session
            .calls()
            .iter()
            .any(|call| matches!(call, SessionCall::Table(_))));
    }

    #[tokio::test]
    async fn test_missing_date_column_fails_at_filter() {
        let table = LocalTable::new(
            Schema::new(["SITE", "TYPE", "UNITS"]).unwrap(),
            vec![vec![Value::from("S1"), Value::from("A"), Value::Int(1)]],
        )
        .unwrap();

        let session = Arc::new(
            RecordingSession::new(Arc::new(registry_with_model())).with_table("raw_data", table),
        );

        for mode in [FilterMode::Applied, FilterMode::Discarded] {
            let session: Arc<dyn Session> = Arc::clone(&session) as Arc<dyn Session>;
            let model = model();
            let err = run_inference(&session, model.as_ref(), &settings(mode))
                .await
                .unwrap_err();

            match err {
                DomainError::MissingColumn { column, .. } => assert_eq!(column, "date"),
                other => panic!("expected missing column, got {other:?}"),
            }
        }

        let service = service(session, FilterMode::Applied);
        let mut presenter = MockPresenter::new();
        assert!(service.run(&mut presenter).await.is_err());
    }

    #[tokio::test]
    async fn test_unknown_inference_function() {
        let session = Arc::new(
            RecordingSession::new(Arc::new(registry_with_model())).with_table("raw_data", raw_data()),
        );
        let mut settings = settings(FilterMode::Applied);
        settings.inference_function = "predict_proba".to_string();
        let service = DashboardService::new(Arc::new(StaticSessionProvider::new(session)), settings);

        let err = service.render_page().await.unwrap_err();
        assert!(matches!(err, DomainError::Inference { .. }));
        assert!(err.to_string().contains("predict"));
    }

    #[tokio::test]
    async fn test_no_active_session() {
        let service = DashboardService::new(
            Arc::new(StaticSessionProvider::without_session()),
            settings(FilterMode::Applied),
        );

        let err = service.render_page().await.unwrap_err();
        assert!(matches!(err, DomainError::Session { .. }));
        assert!(service.check_ready().await.is_err());
    }

    #[tokio::test]
    async fn test_render_page_collects_elements() {
        let session = Arc::new(
            RecordingSession::new(Arc::new(registry_with_model())).with_table("raw_data", raw_data()),
        );
        let page = service(session, FilterMode::Applied)
            .render_page()
            .await
            .unwrap();

        assert_eq!(page.elements.len(), 4);
        assert_eq!(page.title(), Some("Predictions"));
        assert!(matches!(page.elements[3], PageElement::Chart { .. }));
    }

    #[tokio::test]
    async fn test_list_models() {
        let mut registry = MockModelRegistry::new();
        registry
            .expect_list_models()
            .withf(|ns| ns == &namespace())
            .times(1)
            .returning(|_| Ok(Vec::new()));

        let session = Arc::new(RecordingSession::new(Arc::new(registry)));
        let models = service(session, FilterMode::Applied)
            .list_models()
            .await
            .unwrap();
        assert!(models.is_empty());
    }
}
