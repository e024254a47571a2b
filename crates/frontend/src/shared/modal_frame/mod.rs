use gloo_timers::future::TimeoutFuture;
use leptos::ev;
use leptos::prelude::*;
use wasm_bindgen_futures::spawn_local;

/// Overlay plus modal surface with a title bar and a close button.
///
/// The overlay closes the modal only when both mouse press and release land
/// on the overlay itself, so a text selection dragged out of the form does
/// not dismiss it.
#[component]
pub fn ModalFrame(
    #[prop(into)] title: Signal<String>,
    on_close: Callback<()>,
    /// Extra class for the surface, e.g. `modal--wide`
    #[prop(optional)]
    modal_class: &'static str,
    children: Children,
) -> impl IntoView {
    let pressed_on_overlay = RwSignal::new(false);

    let is_overlay_target = |ev: &ev::MouseEvent| match (ev.target(), ev.current_target()) {
        (Some(t), Some(ct)) => t == ct,
        _ => false,
    };

    let on_overlay_click = move |ev: ev::MouseEvent| {
        let close = pressed_on_overlay.get() && is_overlay_target(&ev);
        pressed_on_overlay.set(false);
        if close {
            // Removing the overlay inside its own click dispatch trips leptos
            // event delegation, so close on the next tick.
            spawn_local(async move {
                TimeoutFuture::new(0).await;
                on_close.run(());
            });
        }
    };

    let surface_class = if modal_class.is_empty() {
        "modal".to_string()
    } else {
        format!("modal {modal_class}")
    };

    view! {
        <div
            class="modal-overlay"
            on:mousedown=move |ev| pressed_on_overlay.set(is_overlay_target(&ev))
            on:click=on_overlay_click
        >
            <div class=surface_class on:click=|ev: ev::MouseEvent| ev.stop_propagation()>
                <div class="modal-header">
                    <h2 class="modal-title">{move || title.get()}</h2>
                    <button class="modal-close" title="Close" on:click=move |_| on_close.run(())>
                        "×"
                    </button>
                </div>
                {children()}
            </div>
        </div>
    }
}
