//! Snapshot file to generated files on disk, through the CLI use case

use std::sync::Arc;

use clientsmith::application::GenerateClientsUseCase;
use clientsmith::output::FileSystemOutputSink;
use clientsmith::symbols::FileUniverseLoader;

const SNAPSHOT: &str = r#"{
  "classes": [
    {
      "qualified_name": "com.example.PetApiSpec",
      "package": "com.example",
      "kind": "object",
      "annotations": [
        { "name": "io.clientsmith.annotations.ApiSpec" }
      ]
    },
    {
      "qualified_name": "com.example.models.UserDto",
      "package": "com.example.models",
      "kind": "data_class",
      "annotations": [
        { "name": "kotlinx.serialization.Serializable" }
      ]
    },
    {
      "qualified_name": "com.example.models.GetUsersRequest",
      "package": "com.example.models",
      "kind": "object",
      "annotations": [
        {
          "name": "io.clientsmith.annotations.GET",
          "args": {
            "path": { "kind": "str", "value": "/users" }
          }
        },
        {
          "name": "io.clientsmith.annotations.Returns",
          "args": {
            "success": { "kind": "type", "value": "com.example.models.UserDto" }
          }
        }
      ]
    }
  ]
}"#;

#[tokio::test]
async fn test_generate_from_snapshot_file() {
    let workspace = tempfile::tempdir().unwrap();
    let snapshot_path = workspace.path().join("universe.json");
    tokio::fs::write(&snapshot_path, SNAPSHOT).await.unwrap();
    let output_dir = workspace.path().join("generated");

    let use_case = GenerateClientsUseCase::new(
        Arc::new(FileUniverseLoader::new()),
        Arc::new(FileSystemOutputSink::new(&output_dir)),
    );
    let report = use_case
        .execute(snapshot_path.to_str().unwrap(), false)
        .await
        .unwrap();

    assert_eq!(report.errors, 0);
    assert_eq!(report.written, 2);

    let client = output_dir.join("com/example/client/PetClient.kt");
    let content = tokio::fs::read_to_string(&client).await.unwrap();
    assert!(content.contains("suspend fun getUsers(): ApiResponse<UserDto>"));

    let harness = output_dir.join("com/example/client/PetTestHarness.kt");
    assert!(harness.exists());
}

#[tokio::test]
async fn test_check_mode_writes_nothing() {
    let workspace = tempfile::tempdir().unwrap();
    let snapshot_path = workspace.path().join("universe.json");
    tokio::fs::write(&snapshot_path, SNAPSHOT).await.unwrap();
    let output_dir = workspace.path().join("generated");

    let use_case = GenerateClientsUseCase::new(
        Arc::new(FileUniverseLoader::new()),
        Arc::new(FileSystemOutputSink::new(&output_dir)),
    );
    let report = use_case
        .execute(snapshot_path.to_str().unwrap(), true)
        .await
        .unwrap();

    assert_eq!(report.written, 0);
    assert!(!output_dir.exists());
}

#[tokio::test]
async fn test_invalid_snapshot_fails_validation() {
    let broken = SNAPSHOT.replace("/users", "users");

    let workspace = tempfile::tempdir().unwrap();
    let snapshot_path = workspace.path().join("universe.json");
    tokio::fs::write(&snapshot_path, broken).await.unwrap();
    let output_dir = workspace.path().join("generated");

    let use_case = GenerateClientsUseCase::new(
        Arc::new(FileUniverseLoader::new()),
        Arc::new(FileSystemOutputSink::new(&output_dir)),
    );
    let result = use_case
        .execute(snapshot_path.to_str().unwrap(), false)
        .await;

    assert!(result.is_err());
    assert!(!output_dir.exists());
}
