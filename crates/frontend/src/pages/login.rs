use shared_types::LoginRequest;
use validator::Validate;
use web_sys::HtmlInputElement;
use yew::prelude::*;
use yew_router::prelude::*;

use crate::contexts::use_auth;
use crate::forms::first_error;
use crate::router::Route;
use crate::services::ApiService;

#[function_component(Login)]
pub fn login() -> Html {
    let auth = use_auth();
    let navigator = use_navigator();
    let username = use_state(String::new);
    let password = use_state(String::new);
    let loading = use_state(|| false);
    let error = use_state(|| None::<String>);

    let on_username = {
        let username = username.clone();
        let error = error.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            username.set(input.value());
            error.set(None);
        })
    };

    let on_password = {
        let password = password.clone();
        let error = error.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            password.set(input.value());
            error.set(None);
        })
    };

    let on_submit = {
        let auth = auth.clone();
        let username = username.clone();
        let password = password.clone();
        let loading = loading.clone();
        let error = error.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();

            let request = LoginRequest {
                username: username.trim().to_string(),
                password: (*password).clone(),
            };
            if let Err(errors) = request.validate() {
                error.set(Some(first_error(&errors)));
                return;
            }

            let auth = auth.clone();
            let loading = loading.clone();
            let error = error.clone();
            let navigator = navigator.clone();
            loading.set(true);
            error.set(None);

            wasm_bindgen_futures::spawn_local(async move {
                match ApiService::login(&request).await {
                    Ok(response) => {
                        auth.login(response.token, response.user);
                        if let Some(navigator) = navigator {
                            navigator.push(&Route::Dashboard);
                        }
                    }
                    Err(e) => {
                        tracing::warn!("Login failed: {}", e);
                        error.set(Some(e.message));
                        loading.set(false);
                    }
                }
            });
        })
    };

    if auth.is_authenticated() {
        return html! { <Redirect<Route> to={Route::Dashboard} /> };
    }

    let busy = *loading;

    html! {
        <div class="auth-container">
            <div class="auth-card">
                <div class="auth-header">
                    <h1>{"Sign in"}</h1>
                    <p>{"Welcome back to your food diary"}</p>
                </div>

                <form class="auth-form" onsubmit={on_submit}>
                    {if let Some(err) = &*error {
                        html! { <div class="error-message">{err}</div> }
                    } else {
                        html! {}
                    }}

                    <div class="form-group">
                        <label for="username">{"Username"}</label>
                        <input
                            type="text"
                            id="username"
                            value={(*username).clone()}
                            oninput={on_username}
                            placeholder="Your username"
                            required=true
                            disabled={busy}
                        />
                    </div>

                    <div class="form-group">
                        <label for="password">{"Password"}</label>
                        <input
                            type="password"
                            id="password"
                            value={(*password).clone()}
                            oninput={on_password}
                            placeholder="Your password"
                            required=true
                            disabled={busy}
                        />
                    </div>

                    <button type="submit" class="auth-button" disabled={busy}>
                        {if busy { "Signing in..." } else { "Sign in" }}
                    </button>
                </form>

                <div class="auth-footer">
                    <p>
                        {"No account yet? "}
                        <Link<Route> to={Route::Register} classes="auth-link">{"Register"}</Link<Route>>
                    </p>
                </div>
            </div>
        </div>
    }
}
