// End-to-end importer tests against a local mock recipe site
use gastrobytes::config::ImporterConfig;
use gastrobytes::uploads::UploadStore;
use gastrobytes::{ImageOutcome, ImportError, Importer};
use std::net::SocketAddr;
use tempfile::TempDir;
use tokio::net::TcpListener;

fn recipe_page(json_ld: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
  <title>Recipe</title>
  <script type="text/javascript">window.dataLayer = [];</script>
  <script type="application/ld+json">{json_ld}</script>
</head>
<body><h1>Recipe</h1></body>
</html>"#
    )
}

// The mock site listens on loopback, so most tests allow private hosts
async fn importer() -> (Importer, TempDir) {
    importer_with(ImporterConfig {
        fetch_timeout_seconds: 5,
        image_timeout_seconds: 5,
        allow_private_hosts: true,
        ..ImporterConfig::default()
    })
    .await
}

async fn importer_with(config: ImporterConfig) -> (Importer, TempDir) {
    let dir = tempfile::tempdir().expect("Failed to create upload dir");
    let uploads = UploadStore::open(dir.path())
        .await
        .expect("Failed to open upload store");
    let importer = Importer::new(&config, uploads).expect("Failed to build importer");
    (importer, dir)
}

/// Accept connections and never answer them
async fn silent_server() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind listener");
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });
    addr
}

#[tokio::test]
async fn test_full_import_downloads_image() {
    let mut server = mockito::Server::new_async().await;
    let json_ld = format!(
        r#"{{
            "@context": "https://schema.org",
            "@type": "Recipe",
            "name": "Classic Apple Pie",
            "image": ["{base}/images/apple-pie.jpg?w=1200&h=800", "{base}/images/other.jpg"],
            "recipeIngredient": ["6 apples", "1 cup sugar", "2 pie crusts"],
            "recipeInstructions": [
                {{"@type": "HowToStep", "text": " Peel and slice the apples. "}},
                {{"@type": "HowToStep", "text": "Fill the crust and bake."}}
            ]
        }}"#,
        base = server.url()
    );

    let page = server
        .mock("GET", "/recipes/apple-pie")
        .with_status(200)
        .with_header("content-type", "text/html; charset=utf-8")
        .with_body(recipe_page(&json_ld))
        .create_async()
        .await;
    let image = server
        .mock("GET", "/images/apple-pie.jpg")
        .with_status(200)
        .with_header("content-type", "image/jpeg")
        .with_body(b"\xFF\xD8\xFFfake-jpeg")
        .create_async()
        .await;

    let (importer, dir) = importer().await;
    let report = importer
        .import(&format!("{}/recipes/apple-pie", server.url()))
        .await
        .expect("Import should succeed");

    page.assert_async().await;
    image.assert_async().await;

    assert_eq!(report.recipe.name, "Classic Apple Pie");
    assert_eq!(
        report.recipe.ingredients,
        vec!["6 apples", "1 cup sugar", "2 pie crusts"]
    );
    assert_eq!(
        report.recipe.steps,
        vec!["Peel and slice the apples.", "Fill the crust and bake."]
    );
    assert_eq!(report.recipe.image_filename.as_deref(), Some("apple-pie.jpg"));
    assert_eq!(
        report.image,
        ImageOutcome::Stored {
            filename: "apple-pie.jpg".to_string()
        }
    );

    let stored = std::fs::read(dir.path().join("apple-pie.jpg")).unwrap();
    assert_eq!(stored, b"\xFF\xD8\xFFfake-jpeg");
}

#[tokio::test]
async fn test_missing_image_is_not_fatal() {
    let mut server = mockito::Server::new_async().await;
    let json_ld = format!(
        r#"[{{
            "@type": "Recipe",
            "name": "Lemon Bars",
            "image": "{}/images/lemon-bars.jpg",
            "recipeIngredient": ["4 lemons", "butter"],
            "recipeInstructions": ["Make the crust.", "Add the curd."]
        }}]"#,
        server.url()
    );

    server
        .mock("GET", "/lemon-bars")
        .with_status(200)
        .with_body(recipe_page(&json_ld))
        .create_async()
        .await;
    server
        .mock("GET", "/images/lemon-bars.jpg")
        .with_status(404)
        .create_async()
        .await;

    let (importer, dir) = importer().await;
    let report = importer
        .import(&format!("{}/lemon-bars", server.url()))
        .await
        .expect("Image failure must not fail the import");

    assert_eq!(report.recipe.name, "Lemon Bars");
    assert_eq!(report.recipe.ingredients, vec!["4 lemons", "butter"]);
    assert_eq!(report.recipe.steps, vec!["Make the crust.", "Add the curd."]);
    assert_eq!(report.recipe.image_filename, None);
    assert!(matches!(report.image, ImageOutcome::Unavailable { .. }));
    assert!(!dir.path().join("lemon-bars.jpg").exists());
}

#[tokio::test]
async fn test_array_payload_treated_as_single_recipe() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/wrapped")
        .with_status(200)
        .with_body(recipe_page(
            r#"[{"@type": "Recipe", "name": "Flatbread", "recipeIngredient": ["flour", "water"]}]"#,
        ))
        .create_async()
        .await;

    let (importer, _dir) = importer().await;
    let report = importer
        .import(&format!("{}/wrapped", server.url()))
        .await
        .unwrap();

    assert_eq!(report.recipe.name, "Flatbread");
    assert_eq!(report.recipe.ingredients, vec!["flour", "water"]);
    assert!(report.recipe.steps.is_empty());
    assert_eq!(report.image, ImageOutcome::Missing);
}

#[tokio::test]
async fn test_sparse_block_uses_defaults() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/sparse")
        .with_status(200)
        .with_body(recipe_page(
            r#"{"@type": "Recipe", "recipeInstructions": ["Stir.", {"@type": "HowToSection"}, {"text": "Serve."}]}"#,
        ))
        .create_async()
        .await;

    let (importer, _dir) = importer().await;
    let report = importer
        .import(&format!("{}/sparse", server.url()))
        .await
        .unwrap();

    assert_eq!(report.recipe.name, "Untitled Recipe");
    assert!(report.recipe.ingredients.is_empty());
    assert_eq!(report.recipe.steps, vec!["Stir.", "Serve."]);
}

#[tokio::test]
async fn test_page_without_structured_data() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/blog-post")
        .with_status(200)
        .with_body("<html><head><title>Just a blog</title></head><body>Hi</body></html>")
        .create_async()
        .await;

    let (importer, _dir) = importer().await;
    let result = importer
        .import(&format!("{}/blog-post", server.url()))
        .await;

    assert!(matches!(result, Err(ImportError::NoStructuredData(_))));
}

#[tokio::test]
async fn test_unreachable_page() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/broken")
        .with_status(500)
        .create_async()
        .await;

    let (importer, _dir) = importer().await;
    let result = importer.import(&format!("{}/broken", server.url())).await;

    assert!(matches!(result, Err(ImportError::SourceUnavailable { .. })));
}

#[tokio::test]
async fn test_connection_refused_is_source_unavailable() {
    // Bind then drop a listener to get a port nothing is serving on
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let (importer, _dir) = importer().await;
    let result = importer.import(&format!("http://{addr}/recipe")).await;

    assert!(matches!(result, Err(ImportError::SourceUnavailable { .. })));
}

#[tokio::test]
async fn test_relative_image_resolved_against_page() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/recipes/tart")
        .with_status(200)
        .with_body(recipe_page(
            r#"{"@type": "Recipe", "name": "Tart", "image": "/media/tart.png?crop=1"}"#,
        ))
        .create_async()
        .await;
    server
        .mock("GET", "/media/tart.png")
        .with_status(200)
        .with_body("png-bytes")
        .create_async()
        .await;

    let (importer, dir) = importer().await;
    let report = importer
        .import(&format!("{}/recipes/tart", server.url()))
        .await
        .unwrap();

    assert_eq!(report.recipe.image_filename.as_deref(), Some("tart.png"));
    assert!(dir.path().join("tart.png").exists());
}

#[tokio::test]
async fn test_private_image_host_not_downloaded() {
    let mut server = mockito::Server::new_async().await;
    let json_ld = format!(
        r#"{{"@type": "Recipe", "name": "Scones", "image": "{}/latest/meta-data/creds"}}"#,
        server.url()
    );
    server
        .mock("GET", "/scones")
        .with_status(200)
        .with_body(recipe_page(&json_ld))
        .create_async()
        .await;
    let secret = server
        .mock("GET", "/latest/meta-data/creds")
        .with_status(200)
        .with_body("SECRET")
        .expect(0)
        .create_async()
        .await;

    let (importer, dir) = importer_with(ImporterConfig::default()).await;
    let report = importer
        .import(&format!("{}/scones", server.url()))
        .await
        .expect("A refused image must not fail the import");

    secret.assert_async().await;
    assert_eq!(report.recipe.name, "Scones");
    assert_eq!(report.recipe.image_filename, None);
    assert!(matches!(report.image, ImageOutcome::Unavailable { .. }));
    assert!(!dir.path().join("creds").exists());
}

#[tokio::test]
async fn test_page_timeout_is_source_unavailable() {
    let addr = silent_server().await;

    let (importer, _dir) = importer_with(ImporterConfig {
        fetch_timeout_seconds: 1,
        allow_private_hosts: true,
        ..ImporterConfig::default()
    })
    .await;
    let result = importer.import(&format!("http://{addr}/recipe")).await;

    assert!(matches!(result, Err(ImportError::SourceUnavailable { .. })));
}

#[tokio::test]
async fn test_image_timeout_is_not_fatal() {
    let addr = silent_server().await;
    let mut server = mockito::Server::new_async().await;
    let json_ld = format!(
        r#"{{"@type": "Recipe", "name": "Focaccia", "recipeIngredient": ["flour"], "image": "http://{addr}/focaccia.jpg"}}"#
    );
    server
        .mock("GET", "/focaccia")
        .with_status(200)
        .with_body(recipe_page(&json_ld))
        .create_async()
        .await;

    let (importer, dir) = importer_with(ImporterConfig {
        fetch_timeout_seconds: 5,
        image_timeout_seconds: 1,
        allow_private_hosts: true,
        ..ImporterConfig::default()
    })
    .await;
    let report = importer
        .import(&format!("{}/focaccia", server.url()))
        .await
        .expect("An image timeout must not fail the import");

    assert_eq!(report.recipe.name, "Focaccia");
    assert_eq!(report.recipe.ingredients, vec!["flour"]);
    assert_eq!(report.recipe.image_filename, None);
    assert!(matches!(report.image, ImageOutcome::Unavailable { .. }));
    assert!(!dir.path().join("focaccia.jpg").exists());
}
