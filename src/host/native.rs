use super::Dialogs;
use camino::Utf8PathBuf;
use rfd::{FileDialog, MessageButtons, MessageDialog, MessageLevel};

/// [`Dialogs`] backed by the operating system's native dialogs
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeDialogs;

impl Dialogs for NativeDialogs {
    fn message_box(&self, title: &str, message: &str) {
        MessageDialog::new()
            .set_level(MessageLevel::Info)
            .set_title(title)
            .set_description(message)
            .set_buttons(MessageButtons::Ok)
            .show();
    }

    fn pick_file(
        &self,
        title: &str,
        filter_name: &str,
        extensions: &[&'static str],
        initial_directory: Option<Utf8PathBuf>,
    ) -> Option<Utf8PathBuf> {
        let mut dialog = FileDialog::new()
            .set_title(title)
            .add_filter(filter_name, extensions);

        if let Some(dir) = initial_directory {
            dialog = dialog.set_directory(dir);
        }

        dialog.pick_file().and_then(|path| {
            Utf8PathBuf::try_from(path)
                .map_err(|e| {
                    tracing::error!("Failed to convert path to UTF-8: {}", e);
                    e
                })
                .ok()
        })
    }
}
