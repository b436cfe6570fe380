use yew::prelude::*;
use yew_router::prelude::*;

use crate::contexts::use_auth;
use crate::router::Route;
use crate::services::ApiService;

#[function_component(Header)]
pub fn header() -> Html {
    let auth = use_auth();
    let navigator = use_navigator();

    // Refresh the cached profile once per mount.
    {
        let auth = auth.clone();
        use_effect_with((), move |_| {
            wasm_bindgen_futures::spawn_local(async move {
                match ApiService::profile().await {
                    Ok(user) if auth.user() != Some(&user) => auth.update_user(user),
                    Ok(_) => {}
                    Err(e) => tracing::warn!("Failed to refresh profile: {}", e),
                }
            });
            || ()
        });
    }

    let on_logout = {
        let auth = auth.clone();
        Callback::from(move |_| {
            auth.logout();
            if let Some(navigator) = &navigator {
                navigator.push(&Route::Login);
            }
        })
    };

    let username = auth.user().map(|u| u.username.clone()).unwrap_or_default();

    html! {
        <header class="dashboard-header">
            <div class="logo">
                <span>{"Food Diary"}</span>
            </div>
            <div class="header-right">
                <span class="user-info">{username}</span>
                <button class="logout-btn" onclick={on_logout}>{"Log out"}</button>
            </div>
        </header>
    }
}
