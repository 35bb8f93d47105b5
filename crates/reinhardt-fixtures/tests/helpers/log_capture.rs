//! Tracing capture for asserting on emitted log events.

use std::sync::{Arc, Mutex};

use tracing_subscriber::layer::SubscriberExt as _;
use tracing_subscriber::util::SubscriberInitExt as _;

/// A tracing layer that captures log messages to a `Vec<String>`.
///
/// Each entry reads `[LEVEL] message`.
#[derive(Clone, Default)]
pub struct LogCapture {
	logs: Arc<Mutex<Vec<String>>>,
}

impl LogCapture {
	/// Installs the capture as the thread's default subscriber.
	///
	/// Events are captured until the returned guard is dropped.
	pub fn install(&self) -> tracing::subscriber::DefaultGuard {
		tracing_subscriber::registry().with(self.clone()).set_default()
	}

	/// Returns the captured entries.
	pub fn logs(&self) -> Vec<String> {
		self.logs.lock().unwrap().clone()
	}

	/// Returns true if an entry at `level` contains `text`.
	pub fn contains(&self, level: tracing::Level, text: &str) -> bool {
		let prefix = format!("[{}]", level);
		self.logs()
			.iter()
			.any(|log| log.starts_with(&prefix) && log.contains(text))
	}
}

impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for LogCapture {
	fn on_event(&self, event: &tracing::Event<'_>, _ctx: tracing_subscriber::layer::Context<'_, S>) {
		struct MessageVisitor {
			message: String,
		}

		impl tracing::field::Visit for MessageVisitor {
			fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
				if field.name() == "message" {
					self.message = format!("{:?}", value);
				}
			}
		}

		let mut visitor = MessageVisitor {
			message: String::new(),
		};
		event.record(&mut visitor);

		self.logs.lock().unwrap().push(format!(
			"[{}] {}",
			event.metadata().level(),
			visitor.message
		));
	}
}
