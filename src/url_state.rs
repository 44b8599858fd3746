//! Dataset path in the page URL.
//!
//! The pathname selects the dataset (`/flu/h3n2` loads `flu/h3n2`), so
//! reloading restores the view and URLs can be shared.

/// Reads the initial dataset path from the page URL.
#[cfg(target_arch = "wasm32")]
pub fn initial_datapath() -> Option<String> {
    let pathname = web_sys::window()?.location().pathname().ok()?;
    normalize(&pathname)
}

/// Reads the initial dataset path from the first command-line argument.
#[cfg(not(target_arch = "wasm32"))]
pub fn initial_datapath() -> Option<String> {
    std::env::args().nth(1).and_then(|arg| normalize(&arg))
}

/// Replaces the URL path with the current dataset using `replaceState`.
#[cfg(target_arch = "wasm32")]
pub fn push_datapath(datapath: &str) {
    // Dropped datasets have no URL of their own.
    if datapath.starts_with("dropped/") {
        return;
    }

    let Some(window) = web_sys::window() else {
        return;
    };
    let Ok(history) = window.history() else {
        return;
    };
    let _ = history.replace_state_with_url(
        &wasm_bindgen::JsValue::NULL,
        "",
        Some(&format!("/{}", datapath)),
    );
}

/// No-op stub for native builds.
#[cfg(not(target_arch = "wasm32"))]
pub fn push_datapath(_datapath: &str) {}

fn normalize(raw: &str) -> Option<String> {
    let trimmed = raw.trim().trim_matches('/');
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
