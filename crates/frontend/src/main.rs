use yew::prelude::*;
use yew_router::prelude::*;

mod calendar;
mod components;
mod contexts;
mod forms;
mod pages;
mod router;
mod services;

use crate::contexts::AuthProvider;
use crate::router::{switch, Route};

#[function_component(App)]
fn app() -> Html {
    html! {
        <BrowserRouter>
            <AuthProvider>
                <Switch<Route> render={switch} />
            </AuthProvider>
        </BrowserRouter>
    }
}

fn main() {
    // Initialize tracing
    tracing_wasm::set_as_global_default();

    yew::Renderer::<App>::new().render();
}
