use dioxus::prelude::*;

use jukebox_landing::components::LandingPage;

const LANDING_CSS: Asset = asset!("/assets/landing.css");

fn main() {
    dioxus::logger::initialize_default();
    dioxus::launch(App);
}

#[component]
fn App() -> Element {
    rsx! {
        document::Meta { name: "theme-color", content: "#272730" }
        document::Stylesheet { href: LANDING_CSS }

        LandingPage {}
    }
}
