//! Test fixtures and data generators

use std::io::Cursor;

use image::{ImageFormat, Rgba, RgbaImage};
use reqwest::multipart::{Form, Part};

pub const PASSWORD: &str = "TestPass123!";

/// A signed-in account
#[derive(Debug, Clone)]
pub struct Account {
    pub id: String,
    pub email: String,
    pub token: String,
}

/// A plain light PNG, large enough for a visible watermark
pub fn png_bytes() -> Vec<u8> {
    let image = RgbaImage::from_pixel(240, 120, Rgba([250, 250, 250, 255]));
    let mut out = Cursor::new(Vec::new());
    image
        .write_to(&mut out, ImageFormat::Png)
        .expect("encode test png");
    out.into_inner()
}

/// Upload form for an artwork, with or without a photo
pub fn artwork_form(title: &str, tags: &str, photo: Option<Vec<u8>>) -> Form {
    let form = Form::new()
        .text("title", title.to_string())
        .text("description", "Acrylic on board".to_string())
        .text("price", "250".to_string())
        .text("isBiddable", "true".to_string())
        .text("biddingDays", "2".to_string())
        .text("tags", tags.to_string());

    match photo {
        Some(bytes) => form.part(
            "photo",
            Part::bytes(bytes)
                .file_name("art.png")
                .mime_str("image/png")
                .expect("valid mime"),
        ),
        None => form,
    }
}

/// Form for the photo board, with or without a photo
pub fn post_form(title: &str, story: &str, tags: &str, photo: Option<Vec<u8>>) -> Form {
    let form = Form::new()
        .text("title", title.to_string())
        .text("description", "Pencil on paper".to_string())
        .text("story", story.to_string())
        .text("tags", tags.to_string());

    match photo {
        Some(bytes) => form.part(
            "photo",
            Part::bytes(bytes)
                .file_name("photo.png")
                .mime_str("image/png")
                .expect("valid mime"),
        ),
        None => form,
    }
}
