//! Transient notifications shown in the top-right corner of the shell.
//!
//! Provided once in `App` as a context; pages call
//! `use_notifications().error(..)` and the message disappears on its own.

use gloo_timers::future::TimeoutFuture;
use leptos::prelude::*;
use leptos::task::spawn_local;

/// How long a notification stays on screen.
pub const NOTIFICATION_TTL_MS: u32 = 4000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Warning,
    Error,
}

impl NotificationKind {
    fn modifier(&self) -> &'static str {
        match self {
            NotificationKind::Success => "notification--success",
            NotificationKind::Warning => "notification--warning",
            NotificationKind::Error => "notification--error",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub id: u64,
    pub kind: NotificationKind,
    pub message: String,
}

#[derive(Clone, Copy)]
pub struct NotificationService {
    items: RwSignal<Vec<Notification>>,
    next_id: StoredValue<u64>,
}

impl NotificationService {
    pub fn new() -> Self {
        Self {
            items: RwSignal::new(Vec::new()),
            next_id: StoredValue::new(1),
        }
    }

    pub fn success(&self, message: impl Into<String>) {
        self.push(NotificationKind::Success, message.into());
    }

    pub fn warning(&self, message: impl Into<String>) {
        self.push(NotificationKind::Warning, message.into());
    }

    pub fn error(&self, message: impl Into<String>) {
        self.push(NotificationKind::Error, message.into());
    }

    pub fn dismiss(&self, id: u64) {
        self.items.update(|items| items.retain(|n| n.id != id));
    }

    fn push(&self, kind: NotificationKind, message: String) {
        match kind {
            NotificationKind::Error => log::error!("{}", message),
            NotificationKind::Warning => log::warn!("{}", message),
            NotificationKind::Success => log::info!("{}", message),
        }

        let id = self.next_id.get_value();
        self.next_id.set_value(id + 1);
        self.items.update(|items| items.push(Notification { id, kind, message }));

        let this = *self;
        spawn_local(async move {
            TimeoutFuture::new(NOTIFICATION_TTL_MS).await;
            this.dismiss(id);
        });
    }
}

impl Default for NotificationService {
    fn default() -> Self {
        Self::new()
    }
}

pub fn use_notifications() -> NotificationService {
    use_context::<NotificationService>().expect("NotificationService not provided in context")
}

/// Stack of the currently visible notifications.
#[component]
pub fn NotificationHost() -> impl IntoView {
    let service = use_notifications();

    view! {
        <div class="notification-host">
            <For
                each=move || service.items.get()
                key=|n| n.id
                children=move |n: Notification| {
                    let id = n.id;
                    view! {
                        <div class=format!("notification {}", n.kind.modifier()) role="status">
                            <span class="notification__message">{n.message}</span>
                            <button class="notification__close" on:click=move |_| service.dismiss(id)>
                                "×"
                            </button>
                        </div>
                    }
                }
            />
        </div>
    }
}
