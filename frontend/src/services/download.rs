use anyhow::{anyhow, Result};
use gloo::file::{Blob, ObjectUrl};
use gloo::timers::future::TimeoutFuture;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlAnchorElement;

/// Offer `contents` to the user as a file download
pub fn download_text(filename: &str, contents: &str, mime_type: &str) -> Result<()> {
    let blob = Blob::new_with_options(contents, Some(mime_type));
    let url = ObjectUrl::from(blob);

    let document = gloo::utils::document();
    let link: HtmlAnchorElement = document
        .create_element("a")
        .map_err(|e| anyhow!("failed to create download link: {:?}", e))?
        .dyn_into()
        .map_err(|_| anyhow!("download link is not an anchor element"))?;
    link.set_href(&url);
    link.set_download(filename);
    link.click();

    // the object URL is revoked on drop; give the browser time to start the download
    spawn_local(async move {
        TimeoutFuture::new(1_000).await;
        drop(url);
    });
    Ok(())
}
