//! Image URL helpers for the CDN.

/// Rewrite a Cloudinary delivery URL to request a transcoded, resized
/// asset. Non-Cloudinary URLs pass through untouched.
pub fn optimized_image_url(url: &str, width: u32) -> String {
    if !url.contains("cloudinary") {
        return url.to_string();
    }
    url.replacen("/upload/", &format!("/upload/f_auto,q_auto,w_{width}/"), 1)
}

/// Placeholder avatar for users without a profile image.
pub fn fallback_avatar_url(username: &str) -> String {
    format!("https://ui-avatars.com/api/?name={username}")
}
