// Fbswap Input Layer - Device Filtering
// Which devices the notifier listens to

/// Check if a device should be listened to.
///
/// With an explicit filter, a device matches when its path or its name is
/// listed, whatever its capabilities. With an empty filter only keyboards
/// are used.
pub fn matches_device_filter(
    device_name: &str,
    device_path: &str,
    filter_names: &[String],
    is_keyboard: bool,
) -> bool {
    if !filter_names.is_empty() {
        return filter_names
            .iter()
            .any(|wanted| device_path == wanted || device_name == wanted);
    }

    is_keyboard
}
