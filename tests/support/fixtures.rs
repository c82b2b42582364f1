//! HTML fixtures shaped like the AntWeb images and picture pages.

#![allow(dead_code)]

use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub fn images_page(name: Option<&str>) -> String {
    let name_div = name
        .map(|name| format!(r#"<div class="name">{name}</div>"#))
        .unwrap_or_default();
    format!(
        r#"<html><head><title>AntWeb</title></head><body>
             <div id="page_contents">{name_div}<div class="slide">thumbnails</div></div>
           </body></html>"#
    )
}

pub fn picture_page_with_list(items: &str) -> String {
    format!(
        r#"<html><body>
             <div class="big_picture"><img src="http://example.org/medium.jpg"></div>
             <span id="photo_metadata"><ul>{items}</ul></span>
           </body></html>"#
    )
}

pub fn picture_page_big_picture_only(src: &str) -> String {
    format!(
        r#"<html><body>
             <div class="big_picture"><img src="{src}"></div>
           </body></html>"#
    )
}

pub fn empty_page() -> String {
    "<html><body><p>No images found.</p></body></html>".to_string()
}

pub fn html(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body, "text/html; charset=utf-8")
}

/// Mounts the images page for one genus/species pair.
pub async fn mount_images(server: &MockServer, genus: &str, species: &str, body: String) {
    Mock::given(method("GET"))
        .and(path("/images.do"))
        .and(query_param("genus", genus))
        .and(query_param("species", species))
        .and(query_param("rank", "species"))
        .and(query_param("project", "allantwebants"))
        .respond_with(html(body))
        .mount(server)
        .await;
}

/// Mounts the picture page for one canonical name.
pub async fn mount_picture(server: &MockServer, name: &str, body: String) {
    Mock::given(method("GET"))
        .and(path("/bigPicture.do"))
        .and(query_param("name", name))
        .and(query_param("shot", "h"))
        .and(query_param("number", "1"))
        .respond_with(html(body))
        .mount(server)
        .await;
}
