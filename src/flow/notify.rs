//! User-facing feedback for completed and failed workspace operations.

/// Fire-and-forget user feedback.
pub trait Notifier {
	/// Reports a completed action.
	fn success(&self, message: &str);
	/// Reports a failed action.
	fn error(&self, message: &str);
}

/// Notifier that only writes to the log.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
	fn success(&self, message: &str) {
		log::info!("{}", message);
	}

	fn error(&self, message: &str) {
		log::error!("{}", message);
	}
}

impl<N: Notifier + ?Sized> Notifier for &N {
	fn success(&self, message: &str) {
		(**self).success(message)
	}

	fn error(&self, message: &str) {
		(**self).error(message)
	}
}
