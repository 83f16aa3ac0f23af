//! Common utilities and helpers

pub mod logging;
pub mod time;

/// Display helpers shared by the reporters
pub struct Utils;

impl Utils {
    /// Format file size for display
    pub fn format_file_size(size: u64) -> String {
        const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
        let mut size = size as f64;
        let mut unit_index = 0;

        while size >= 1024.0 && unit_index < UNITS.len() - 1 {
            size /= 1024.0;
            unit_index += 1;
        }

        if unit_index == 0 {
            format!("{} {}", size as u64, UNITS[unit_index])
        } else {
            format!("{:.1} {}", size, UNITS[unit_index])
        }
    }

    /// Text progress bar, e.g. `[#####-----] 50.0%`
    pub fn progress_bar(percent: f64, width: usize) -> String {
        let percent = percent.clamp(0.0, 100.0);
        let filled = ((width as f64 * percent / 100.0) as usize).min(width);
        format!(
            "[{}{}] {:>5.1}%",
            "#".repeat(filled),
            "-".repeat(width - filled),
            percent
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_file_size() {
        assert_eq!(Utils::format_file_size(512), "512 B");
        assert_eq!(Utils::format_file_size(1536), "1.5 KB");
        assert_eq!(Utils::format_file_size(5 * 1024 * 1024), "5.0 MB");
    }

    #[test]
    fn test_progress_bar() {
        assert_eq!(Utils::progress_bar(50.0, 10), "[#####-----]  50.0%");
        assert_eq!(Utils::progress_bar(150.0, 4), "[####] 100.0%");
        assert_eq!(Utils::progress_bar(0.0, 4), "[----]   0.0%");
    }
}
