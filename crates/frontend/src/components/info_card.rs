use dioxus::prelude::*;

#[component]
pub fn InfoCard(#[props(into)] title: String, children: Element) -> Element {
    rsx! {
        div { class: "card",
            div { class: "card-header compact",
                h3 { class: "card-title small", "{title}" }
            }
            div { class: "card-content",
                p { class: "info-text", {children} }
            }
        }
    }
}
