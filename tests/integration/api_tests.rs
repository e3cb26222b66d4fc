//! End-to-end tests against a running server with a migrated database

use reqwest::{multipart, redirect, Client, StatusCode};
use tokio_test::assert_ok;

const BASE_URL: &str = "http://localhost:3000";

/// Client that reports redirects instead of following them
fn client() -> Client {
    Client::builder()
        .redirect(redirect::Policy::none())
        .build()
        .expect("Failed to build client")
}

fn location(response: &reqwest::Response) -> String {
    response
        .headers()
        .get("location")
        .and_then(|v| v.to_str().ok())
        .expect("No location header")
        .to_string()
}

fn unique(prefix: &str) -> String {
    format!("{} {}", prefix, uuid::Uuid::new_v4().simple())
}

/// Create an author and return its id
async fn create_author(client: &Client, name: &str) -> String {
    let response = client
        .post(format!("{}/authors", BASE_URL))
        .form(&[("name", name)])
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    location(&response)
        .strip_prefix("/authors/")
        .expect("Redirect to author page")
        .to_string()
}

/// First `/books/{id}` link on a page
fn first_book_id(html: &str) -> Option<String> {
    let start = html.find("href=\"/books/")? + "href=\"/books/".len();
    let end = html[start..].find('"')? + start;
    Some(html[start..end].to_string())
}

/// First stored cover path (`/uploads/bookCovers/...`) on a page
fn cover_path(html: &str) -> Option<String> {
    let start = html.find("/uploads/bookCovers/")?;
    let end = html[start..].find('"')? + start;
    Some(html[start..end].to_string())
}

async fn page(client: &Client, path: &str) -> String {
    client
        .get(format!("{}{}", BASE_URL, path))
        .send()
        .await
        .expect("Failed to send request")
        .text()
        .await
        .expect("Failed to read body")
}

fn book_form(title: &str, author_id: &str) -> multipart::Form {
    multipart::Form::new()
        .text("title", title.to_string())
        .text("author", author_id.to_string())
        .text("publishedDate", "1965-08-01")
        .text("pageCount", "412")
        .text("description", "Desert planet")
}

fn png_part() -> multipart::Part {
    multipart::Part::bytes(b"\x89PNG\r\n\x1a\nfake".to_vec())
        .file_name("dune.png")
        .mime_str("image/png")
        .expect("valid mime")
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_health_check() {
    let response = client()
        .get(format!("{}/health", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());
    let body: serde_json::Value = assert_ok!(response.json().await);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_author_lifecycle() {
    let client = client();
    let name = unique("Frank Herbert");
    let id = create_author(&client, &name).await;

    // case-insensitive search
    let html = client
        .get(format!("{}/authors", BASE_URL))
        .query(&[("name", name.to_lowercase())])
        .send()
        .await
        .expect("Failed to send request")
        .text()
        .await
        .expect("Failed to read body");
    assert!(html.contains(&name));

    // update through a method-overridden form post
    let renamed = unique("F. Herbert");
    let response = client
        .post(format!("{}/authors/{}", BASE_URL, id))
        .form(&[("_method", "PUT"), ("name", renamed.as_str())])
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), format!("/authors/{}", id));

    let html = assert_ok!(
        client
            .get(format!("{}/authors/{}", BASE_URL, id))
            .send()
            .await
            .expect("Failed to send request")
            .text()
            .await
    );
    assert!(html.contains(&renamed));

    let response = client
        .post(format!("{}/authors/{}", BASE_URL, id))
        .form(&[("_method", "DELETE")])
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(location(&response), "/authors");

    // gone: the show page sends us home
    let response = client
        .get(format!("{}/authors/{}", BASE_URL, id))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(location(&response), "/");
}

#[tokio::test]
#[ignore]
async fn test_create_book_with_file_cover() {
    let client = client();
    let author_id = create_author(&client, &unique("Frank Herbert")).await;
    let title = unique("Dune");

    let response = client
        .post(format!("{}/books", BASE_URL))
        .multipart(book_form(&title, &author_id).part("cover", png_part()))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/books");

    let html = client
        .get(format!("{}/books", BASE_URL))
        .query(&[("title", title.as_str()), ("publishedAfter", "1965-01-01")])
        .send()
        .await
        .expect("Failed to send request")
        .text()
        .await
        .expect("Failed to read body");
    assert!(html.contains(&title));
    assert!(html.contains("/uploads/bookCovers/cover-"));
    let book_id = first_book_id(&html).expect("Book link");

    // an author with books cannot be removed
    let response = client
        .post(format!("{}/authors/{}", BASE_URL, author_id))
        .form(&[("_method", "DELETE")])
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(location(&response), format!("/authors/{}", author_id));

    let response = client
        .post(format!("{}/books/{}?_method=DELETE", BASE_URL, book_id))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(location(&response), "/books");
}

#[tokio::test]
#[ignore]
async fn test_create_book_with_encoded_cover() {
    let client = client();
    let author_id = create_author(&client, &unique("Ursula K. Le Guin")).await;
    let title = unique("The Left Hand of Darkness");

    let cover = r#"{"type": "image/gif", "data": "R0lGODk="}"#;
    let response = client
        .post(format!("{}/books", BASE_URL))
        .multipart(book_form(&title, &author_id).text("cover", cover))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let html = client
        .get(format!("{}/books", BASE_URL))
        .query(&[("title", title.as_str())])
        .send()
        .await
        .expect("Failed to send request")
        .text()
        .await
        .expect("Failed to read body");
    assert!(html.contains("data:image/gif;charset=utf-8;base64,R0lGODk="));
}

#[tokio::test]
#[ignore]
async fn test_book_cover_must_be_an_image() {
    let client = client();
    let author_id = create_author(&client, &unique("Stanisław Lem")).await;

    let pdf = multipart::Part::bytes(b"%PDF-1.4".to_vec())
        .file_name("solaris.pdf")
        .mime_str("application/pdf")
        .expect("valid mime");
    let response = client
        .post(format!("{}/books", BASE_URL))
        .multipart(book_form("Solaris", &author_id).part("cover", pdf))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.text().await.expect("body").contains("Error: Images only"));

    let response = client
        .post(format!("{}/books", BASE_URL))
        .multipart(book_form("Solaris", &author_id))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.text().await.expect("body").contains("Error: No file selected"));
}

#[tokio::test]
#[ignore]
async fn test_update_replaces_cover() {
    let client = client();
    let author_id = create_author(&client, &unique("Octavia E. Butler")).await;
    let title = unique("Kindred");

    let response = client
        .post(format!("{}/books", BASE_URL))
        .multipart(book_form(&title, &author_id).part("cover", png_part()))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let html = client
        .get(format!("{}/books", BASE_URL))
        .query(&[("title", title.as_str())])
        .send()
        .await
        .expect("Failed to send request")
        .text()
        .await
        .expect("Failed to read body");
    let book_id = first_book_id(&html).expect("Book link");
    let first_cover = cover_path(&html).expect("Stored cover");
    let status = client.get(format!("{}{}", BASE_URL, first_cover)).send().await.unwrap().status();
    assert_eq!(status, StatusCode::OK);

    // a new file replaces the old one on disk
    let response = client
        .post(format!("{}/books/{}?_method=PUT", BASE_URL, book_id))
        .multipart(book_form(&title, &author_id).part("cover", png_part()))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(location(&response), format!("/books/{}", book_id));

    let html = page(&client, &format!("/books/{}", book_id)).await;
    let second_cover = cover_path(&html).expect("Stored cover");
    assert_ne!(second_cover, first_cover);
    let status = client.get(format!("{}{}", BASE_URL, first_cover)).send().await.unwrap().status();
    assert_eq!(status, StatusCode::NOT_FOUND);

    // an encoded cover takes the place of the stored file
    let cover = r#"{"type": "image/png", "data": "iVBORw0K"}"#;
    let response = client
        .post(format!("{}/books/{}?_method=PUT", BASE_URL, book_id))
        .multipart(book_form(&title, &author_id).text("cover", cover))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(location(&response), format!("/books/{}", book_id));

    let html = page(&client, &format!("/books/{}", book_id)).await;
    assert!(html.contains("data:image/png;charset=utf-8;base64,iVBORw0K"));
    assert!(cover_path(&html).is_none());
    let status = client.get(format!("{}{}", BASE_URL, second_cover)).send().await.unwrap().status();
    assert_eq!(status, StatusCode::NOT_FOUND);

    let response = client
        .post(format!("{}/books/{}?_method=DELETE", BASE_URL, book_id))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(location(&response), "/books");
}
