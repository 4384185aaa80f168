//! Width-bounded resize planning

/// Target size for an image of `width`x`height` bounded by `max_width`.
///
/// Returns `None` when the image already fits (never upscales). Otherwise the
/// width becomes `max_width` and the height is `floor(max_width * height / width)`,
/// which can be 0 for extremely wide images.
pub fn target_dimensions(width: u32, height: u32, max_width: u32) -> Option<(u32, u32)> {
    if width <= max_width {
        return None;
    }
    let new_height = u64::from(max_width) * u64::from(height) / u64::from(width);
    Some((max_width, new_height as u32))
}
