/**
 * Profile Photos
 *
 * Photos are downloaded over HTTP, checked to be JPEG, cropped and stored
 * in the image directory, which the router serves under `/imgurl`.
 * Decoding and encoding run on the blocking pool.
 */

use std::io::Cursor;
use std::path::{Path, PathBuf};

use image::{DynamicImage, ImageFormat, Rgb, RgbImage};

use crate::backend::error::BackendError;
use crate::shared::messaging::UploadPhotoRequest;
use crate::shared::AppConfig;

/// Served to users who never uploaded a photo
pub const DEFAULT_IMAGE_FILE: &str = "default.jpg";

const DEFAULT_IMAGE_SIZE: u32 = 200;

/// Public URL of a file in the image directory
pub fn image_url(config: &AppConfig, file: &str) -> String {
    format!("{}/imgurl/{}", config.base_url, file)
}

pub fn default_image_url(config: &AppConfig) -> String {
    image_url(config, DEFAULT_IMAGE_FILE)
}

/// Create the image directory and a plain default photo if missing
pub async fn ensure_default_image(image_dir: &Path) -> Result<(), BackendError> {
    tokio::fs::create_dir_all(image_dir).await.map_err(|e| {
        BackendError::storage(format!("Failed to create {}: {}", image_dir.display(), e))
    })?;

    let path = image_dir.join(DEFAULT_IMAGE_FILE);
    if tokio::fs::try_exists(&path).await.unwrap_or(false) {
        return Ok(());
    }

    tokio::task::spawn_blocking(move || {
        let image = RgbImage::from_pixel(DEFAULT_IMAGE_SIZE, DEFAULT_IMAGE_SIZE, Rgb([200, 200, 200]));
        image.save_with_format(&path, ImageFormat::Jpeg)
    })
    .await
    .map_err(|e| BackendError::state(format!("Default image task failed: {}", e)))?
    .map_err(|e| BackendError::storage(format!("Failed to write default image: {}", e)))?;

    tracing::info!("Created default profile image in {}", image_dir.display());
    Ok(())
}

/// Crop box in source pixels, already checked against the image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropBox {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Check the requested box lies inside a `width` x `height` image
pub fn crop_box(request: &UploadPhotoRequest, width: u32, height: u32) -> Result<CropBox, BackendError> {
    if request.x_end <= request.x_start || request.y_end <= request.y_start {
        return Err(BackendError::input("xEnd and yEnd must be greater than xStart and yStart"));
    }
    let inside = |value: i64, limit: u32| value >= 0 && value <= i64::from(limit);
    if !(inside(request.x_start, width)
        && inside(request.x_end, width)
        && inside(request.y_start, height)
        && inside(request.y_end, height))
    {
        return Err(BackendError::input("Crop bounds are not within the image"));
    }

    Ok(CropBox {
        x: request.x_start as u32,
        y: request.y_start as u32,
        width: (request.x_end - request.x_start) as u32,
        height: (request.y_end - request.y_start) as u32,
    })
}

async fn download(client: &reqwest::Client, url: &str) -> Result<Vec<u8>, BackendError> {
    let response = client.get(url).send().await.map_err(|e| {
        tracing::warn!("Failed to fetch {}: {}", url, e);
        BackendError::input("imgUrl could not be retrieved")
    })?;
    if response.status() != reqwest::StatusCode::OK {
        tracing::warn!("Fetching {} returned {}", url, response.status());
        return Err(BackendError::input("imgUrl returned a non-200 status"));
    }
    let bytes = response
        .bytes()
        .await
        .map_err(|_| BackendError::input("imgUrl could not be retrieved"))?;
    Ok(bytes.to_vec())
}

fn decode_jpeg(bytes: &[u8]) -> Result<DynamicImage, BackendError> {
    match image::guess_format(bytes) {
        Ok(ImageFormat::Jpeg) => {}
        _ => return Err(BackendError::input("Image uploaded is not a JPG")),
    }
    image::load_from_memory_with_format(bytes, ImageFormat::Jpeg)
        .map_err(|_| BackendError::input("Image uploaded is not a JPG"))
}

/// Download, check, crop and store a photo for `u_id`. Returns the stored file name.
pub async fn store_photo(
    client: &reqwest::Client,
    image_dir: PathBuf,
    u_id: u32,
    request: UploadPhotoRequest,
) -> Result<String, BackendError> {
    let bytes = download(client, &request.img_url).await?;
    let file = format!("{}-{}.jpg", u_id, uuid::Uuid::new_v4().simple());
    let path = image_dir.join(&file);

    tokio::task::spawn_blocking(move || -> Result<(), BackendError> {
        let image = decode_jpeg(&bytes)?;
        let crop = crop_box(&request, image.width(), image.height())?;
        let cropped = image.crop_imm(crop.x, crop.y, crop.width, crop.height).to_rgb8();

        let mut encoded = Cursor::new(Vec::new());
        cropped
            .write_to(&mut encoded, ImageFormat::Jpeg)
            .map_err(|e| BackendError::state(format!("Failed to encode photo: {}", e)))?;
        std::fs::write(&path, encoded.into_inner())
            .map_err(|e| BackendError::storage(format!("Failed to save photo: {}", e)))
    })
    .await
    .map_err(|e| BackendError::state(format!("Photo task failed: {}", e)))??;

    Ok(file)
}

/// File in the image directory that `url` points at, unless it is the shared default
pub fn uploaded_file<'a>(config: &AppConfig, url: &'a str) -> Option<&'a str> {
    let prefix = image_url(config, "");
    url.strip_prefix(prefix.as_str())
        .filter(|file| !file.is_empty() && *file != DEFAULT_IMAGE_FILE && !file.contains('/'))
}

/// Delete a photo that no profile points at any more
pub async fn discard_photo(config: &AppConfig, old_url: &str) {
    let Some(file) = uploaded_file(config, old_url) else {
        return;
    };
    let path = config.image_dir.join(file);
    if let Err(e) = tokio::fs::remove_file(&path).await {
        tracing::warn!("Failed to remove old photo {}: {}", path.display(), e);
    }
}
