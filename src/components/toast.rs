use std::time::Duration;

use leptos::prelude::*;

use crate::flow::Notifier;

const TOAST_TTL: Duration = Duration::from_secs(4);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToastKind {
	Success,
	Error,
}

impl ToastKind {
	fn class(self) -> &'static str {
		match self {
			ToastKind::Success => "toast toast-success",
			ToastKind::Error => "toast toast-error",
		}
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct Toast {
	pub id: u64,
	pub kind: ToastKind,
	pub message: String,
}

/// App-wide toast queue, provided as context. Toasts dismiss themselves
/// after a few seconds or when clicked.
#[derive(Clone, Copy)]
pub struct Toaster {
	toasts: RwSignal<Vec<Toast>>,
	next_id: StoredValue<u64>,
}

impl Default for Toaster {
	fn default() -> Self {
		Self::new()
	}
}

impl Toaster {
	pub fn new() -> Self {
		Self {
			toasts: RwSignal::new(Vec::new()),
			next_id: StoredValue::new(0),
		}
	}

	pub fn push(&self, kind: ToastKind, message: &str) {
		let id = self.next_id.get_value();
		self.next_id.set_value(id + 1);
		self.toasts.update(|t| {
			t.push(Toast {
				id,
				kind,
				message: message.to_owned(),
			})
		});
		let toasts = self.toasts;
		set_timeout(
			move || {
				toasts.try_update(|t| t.retain(|toast| toast.id != id));
			},
			TOAST_TTL,
		);
	}

	pub fn dismiss(&self, id: u64) {
		self.toasts.update(|t| t.retain(|toast| toast.id != id));
	}
}

impl Notifier for Toaster {
	fn success(&self, message: &str) {
		log::info!("{}", message);
		self.push(ToastKind::Success, message);
	}

	fn error(&self, message: &str) {
		log::error!("{}", message);
		self.push(ToastKind::Error, message);
	}
}

/// Renders the [`Toaster`] from context.
#[component]
pub fn ToastStack() -> impl IntoView {
	let toaster = expect_context::<Toaster>();

	view! {
		<div class="toast-stack">
			<For
				each=move || toaster.toasts.get()
				key=|toast| toast.id
				children=move |Toast { id, kind, message }| {
					view! {
						<div class=kind.class() on:click=move |_| toaster.dismiss(id)>
							{message}
						</div>
					}
				}
			/>
		</div>
	}
}
