mod common;

use common::{column, key, user_columns, FakeSource};
use daogen_schema::{
    FileState, GeneratorConfig, Generator, Layer, LayerOutcome, ModuleRequest, SchemaError,
    TableOutcome,
};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const PROJECT: &str = "daogen_fixture_project";

fn module_dir(root: &TempDir) -> PathBuf {
    root.path().join(PROJECT).join("src").join("dal")
}

fn config(root: &TempDir, tables: &[&str]) -> GeneratorConfig {
    GeneratorConfig {
        dsn: "mysql://fake@localhost/app".to_string(),
        project: PROJECT.to_string(),
        modules: tables
            .iter()
            .map(|t| ModuleRequest::new(*t, module_dir(root).to_string_lossy()))
            .collect(),
    }
}

fn source() -> FakeSource {
    FakeSource::new().table("user", user_columns())
}

fn layer_outcomes(report: &daogen_schema::GenerationReport, table: usize) -> Vec<(Layer, String)> {
    match &report.tables[table].outcome {
        TableOutcome::Generated(layers) => layers
            .iter()
            .map(|l| (l.layer, l.outcome.to_string()))
            .collect(),
        TableOutcome::Failed(e) => panic!("table failed: {}", e),
    }
}

fn read(path: &Path) -> String {
    fs::read_to_string(path).unwrap()
}

#[tokio::test]
async fn test_first_run_writes_every_layer() {
    let root = tempfile::tempdir().unwrap();
    let generator = Generator::new(config(&root, &["user"])).unwrap();
    let report = generator.generate(&source()).await.unwrap();

    assert!(!report.has_failures());
    let outcomes = layer_outcomes(&report, 0);
    assert_eq!(
        outcomes.iter().map(|(l, _)| *l).collect::<Vec<_>>(),
        Layer::ALL.to_vec()
    );
    assert!(outcomes.iter().all(|(_, o)| o == "written"));

    let dal = module_dir(&root);
    for (dir, file) in [
        ("model", "user_model.rs"),
        ("model", "user_extend.rs"),
        ("view", "user_view.rs"),
        ("param", "user_param.rs"),
        ("dao", "user_dao.rs"),
        ("service", "user_service.rs"),
        ("controller", "user_controller.rs"),
    ] {
        let content = read(&dal.join(dir).join(file));
        assert!(syn::parse_file(&content).is_ok(), "{} does not parse", file);
        assert!(content.starts_with("// Code generated by daogen from table `user`."));
    }
}

#[tokio::test]
async fn test_model_content() {
    let root = tempfile::tempdir().unwrap();
    Generator::new(config(&root, &["user"]))
        .unwrap()
        .generate(&source())
        .await
        .unwrap();

    let model = read(&module_dir(&root).join("model/user_model.rs"));
    assert!(model.contains("pub const TABLE_NAME: &str = \"user\";"));
    assert!(model.contains("/// Display name\npub const NAME: &str = \"name\";"));
    assert!(model.contains("#[derive(Debug, Clone, Default, PartialEq, Record, Serialize, Deserialize)]"));
    assert!(model.contains("pub struct UserModel {"));
    assert!(model.contains("    #[column(name = \"created_at\")]\n"));
    assert!(model.contains("    #[serde(alias = \"createdAt\")]\n"));
    assert!(model.contains("    pub created_at: Option<chrono::NaiveDateTime>,\n"));
    assert!(model.contains("use daogen::chrono;"));
    assert!(model.contains("pub fn update_sql_by_selective(&self) -> Result<Statement> {"));

    let dao = read(&module_dir(&root).join("dao/user_dao.rs"));
    assert!(dao.contains("use crate::dal::model::user_model::{self, UserModel};"));
    assert!(dao.contains("pub async fn query_by_primary_key(executor: &Executor, id: i32) -> Result<Option<UserModel>> {"));
    assert!(dao.contains("pub async fn query_map_by_primary_keys("));

    let service = read(&module_dir(&root).join("service/user_service.rs"));
    assert!(service.contains("use crate::dal::dao::user_dao;"));
    assert!(service.contains("user_dao::query_by_primary_key(executor, id).await"));
}

#[tokio::test]
async fn test_rerun_regenerates_model_and_preserves_the_rest() {
    let root = tempfile::tempdir().unwrap();
    let generator = Generator::new(config(&root, &["user"])).unwrap();
    generator.generate(&source()).await.unwrap();

    let dal = module_dir(&root);
    let model_path = dal.join("model/user_model.rs");
    let service_path = dal.join("service/user_service.rs");
    let first_model = read(&model_path);
    let first_service = read(&service_path);

    let report = generator.generate(&source()).await.unwrap();
    let outcomes = layer_outcomes(&report, 0);
    assert_eq!(outcomes[0], (Layer::Model, "regenerated".to_string()));
    assert!(outcomes[1..].iter().all(|(_, o)| o == "preserved"));
    assert_eq!(read(&model_path), first_model);
    assert_eq!(read(&service_path), first_service);
}

#[tokio::test]
async fn test_hand_edits() {
    let root = tempfile::tempdir().unwrap();
    let generator = Generator::new(config(&root, &["user"])).unwrap();
    generator.generate(&source()).await.unwrap();

    let dal = module_dir(&root);
    let model_path = dal.join("model/user_model.rs");
    let service_path = dal.join("service/user_service.rs");
    let pristine_model = read(&model_path);

    let edited_service = format!("{}\npub fn extra() {{}}\n", read(&service_path));
    fs::write(&service_path, &edited_service).unwrap();
    fs::write(&model_path, format!("{}\n// local note\n", pristine_model)).unwrap();

    let report = generator.generate(&source()).await.unwrap();
    let outcomes = layer_outcomes(&report, 0);
    assert_eq!(
        outcomes[0],
        (Layer::Model, "regenerated, hand edits discarded".to_string())
    );
    assert!(outcomes.contains(&(Layer::Service, "preserved, diverged".to_string())));
    assert!(matches!(
        &report.tables[0].outcome,
        TableOutcome::Generated(layers)
            if matches!(layers[0].outcome, LayerOutcome::Overwritten { discarded_edits: true })
    ));

    assert_eq!(read(&service_path), edited_service);
    assert_eq!(read(&model_path), pristine_model);
}

#[tokio::test]
async fn test_module_registration_is_idempotent() {
    let root = tempfile::tempdir().unwrap();
    let generator = Generator::new(config(&root, &["user"])).unwrap();
    generator.generate(&source()).await.unwrap();
    generator.generate(&source()).await.unwrap();

    let dal = module_dir(&root);
    assert_eq!(
        read(&dal.join("model/mod.rs")),
        "pub mod user_model;\npub mod user_extend;\n"
    );
    assert_eq!(read(&dal.join("dao/mod.rs")), "pub mod user_dao;\n");
}

#[tokio::test]
async fn test_failed_table_does_not_stop_the_batch() {
    let root = tempfile::tempdir().unwrap();
    let source = source()
        .table("audit", vec![column("message", "text")])
        .table("shape", vec![key("id", "int"), column("area", "geometry")]);
    let generator = Generator::new(config(&root, &["ghost", "audit", "shape", "user"])).unwrap();

    let report = generator.generate(&source).await.unwrap();
    assert!(report.has_failures());
    assert_eq!(report.tables.len(), 4);

    let codes: Vec<_> = report.tables[..3]
        .iter()
        .map(|t| match &t.outcome {
            TableOutcome::Failed(e) => e.error_code(),
            TableOutcome::Generated(_) => "generated",
        })
        .collect();
    assert_eq!(
        codes,
        vec!["E_TABLE_NOT_FOUND", "E_NO_PRIMARY_KEY", "E_UNSUPPORTED_COLUMN_TYPE"]
    );
    assert!(!report.tables[3].is_failure());
    assert!(!module_dir(&root).join("model/audit_model.rs").exists());
    assert!(module_dir(&root).join("model/user_model.rs").exists());
}

fn failures(report: &daogen_schema::GenerationReport) -> Vec<(Layer, &'static str)> {
    match &report.tables[0].outcome {
        TableOutcome::Generated(layers) => layers
            .iter()
            .filter_map(|l| match &l.outcome {
                LayerOutcome::Failed(e) => Some((l.layer, e.error_code())),
                _ => None,
            })
            .collect(),
        TableOutcome::Failed(e) => panic!("table failed: {}", e),
    }
}

fn unresolved(report: &daogen_schema::GenerationReport, layer: Layer) -> Vec<Layer> {
    match &report.tables[0].outcome {
        TableOutcome::Generated(layers) => layers
            .iter()
            .find(|l| l.layer == layer)
            .map(|l| l.unresolved.clone())
            .unwrap_or_default(),
        TableOutcome::Failed(e) => panic!("table failed: {}", e),
    }
}

#[tokio::test]
async fn test_failed_layer_leaves_siblings_attempted() {
    let root = tempfile::tempdir().unwrap();
    let source = FakeSource::new().table("report", vec![key("id", "int"), column("page_size", "int")]);
    let report = Generator::new(config(&root, &["report"]))
        .unwrap()
        .generate(&source)
        .await
        .unwrap();

    assert!(report.has_failures());
    assert_eq!(failures(&report), vec![(Layer::Param, "E_INVALID_IDENTIFIER")]);
    let written: Vec<_> = layer_outcomes(&report, 0)
        .into_iter()
        .filter(|(_, o)| o == "written")
        .map(|(l, _)| l)
        .collect();
    assert_eq!(
        written,
        vec![
            Layer::Model,
            Layer::Extend,
            Layer::View,
            Layer::Dao,
            Layer::Service,
            Layer::Controller
        ]
    );

    let dal = module_dir(&root);
    assert!(!dal.join("param/report_param.rs").exists());
    assert!(dal.join("service/report_service.rs").exists());
    assert_eq!(unresolved(&report, Layer::Service), vec![Layer::Param]);
    assert!(unresolved(&report, Layer::Dao).is_empty());
}

#[tokio::test]
async fn test_write_failure_is_reported_per_layer() {
    let root = tempfile::tempdir().unwrap();
    let dal = module_dir(&root);
    fs::create_dir_all(&dal).unwrap();
    fs::write(dal.join("dao"), "not a directory").unwrap();

    let report = Generator::new(config(&root, &["user"]))
        .unwrap()
        .generate(&source())
        .await
        .unwrap();

    assert_eq!(failures(&report), vec![(Layer::Dao, "E_WRITE")]);
    assert_eq!(unresolved(&report, Layer::Service), vec![Layer::Dao]);
    assert!(dal.join("service/user_service.rs").exists());
    assert!(dal.join("controller/user_controller.rs").exists());
}

#[tokio::test]
async fn test_layer_selection() {
    let root = tempfile::tempdir().unwrap();
    let mut config = config(&root, &["user"]);
    config.modules[0] = config.modules[0]
        .clone()
        .with_layers([Layer::Model, Layer::Dao]);
    let report = Generator::new(config).unwrap().generate(&source()).await.unwrap();

    let layers: Vec<_> = layer_outcomes(&report, 0).into_iter().map(|(l, _)| l).collect();
    assert_eq!(layers, vec![Layer::Model, Layer::Dao]);

    let dao = read(&module_dir(&root).join("dao/user_dao.rs"));
    assert!(!dao.contains("query_extend_by_sql"));
    assert!(!module_dir(&root).join("view").exists());
}

#[tokio::test]
async fn test_configuration_error_is_fatal() {
    let root = tempfile::tempdir().unwrap();
    let mut config = config(&root, &["user"]);
    config.dsn.clear();

    let err = Generator::new(config).unwrap().generate(&source()).await.unwrap_err();
    assert!(matches!(err, SchemaError::Configuration(_)));
    assert!(!module_dir(&root).exists());
}

#[tokio::test]
async fn test_status() {
    let root = tempfile::tempdir().unwrap();
    let generator = Generator::new(config(&root, &["user"])).unwrap();

    let before = generator.status().await.unwrap();
    assert_eq!(before.len(), Layer::ALL.len());
    assert!(before.iter().all(|e| e.state == FileState::Missing));

    generator.generate(&source()).await.unwrap();
    let service_path = module_dir(&root).join("service/user_service.rs");
    fs::write(&service_path, "pub fn replaced() {}\n").unwrap();

    let after = generator.status().await.unwrap();
    for entry in after {
        let expected = if entry.layer == Layer::Service {
            FileState::Diverged
        } else {
            FileState::Pristine
        };
        assert_eq!(entry.state, expected, "{}", entry.layer);
    }
}
