use gloo::timers::callback::Timeout;
use web_sys::HtmlInputElement;
use yew::prelude::*;
use yew_router::prelude::*;

use crate::forms::{validate_registration, RegistrationForm};
use crate::router::Route;
use crate::services::ApiService;

const REDIRECT_DELAY_MS: u32 = 2000;

#[function_component(Register)]
pub fn register() -> Html {
    let navigator = use_navigator();
    let form = use_state(RegistrationForm::default);
    let show_password = use_state(|| false);
    let show_confirm = use_state(|| false);
    let loading = use_state(|| false);
    let error = use_state(|| None::<String>);
    let success = use_state(|| None::<String>);

    // Any edit clears the previous outcome.
    let on_field = {
        let form = form.clone();
        let error = error.clone();
        let success = success.clone();
        move |apply: fn(&mut RegistrationForm, String)| {
            let form = form.clone();
            let error = error.clone();
            let success = success.clone();
            Callback::from(move |e: InputEvent| {
                let input: HtmlInputElement = e.target_unchecked_into();
                let mut next = (*form).clone();
                apply(&mut next, input.value());
                form.set(next);
                error.set(None);
                success.set(None);
            })
        }
    };

    let on_username = on_field(|f: &mut RegistrationForm, v: String| f.username = v);
    let on_email = on_field(|f: &mut RegistrationForm, v: String| f.email = v);
    let on_password = on_field(|f: &mut RegistrationForm, v: String| f.password = v);
    let on_confirm = on_field(|f: &mut RegistrationForm, v: String| f.confirm_password = v);

    let toggle_password = {
        let show_password = show_password.clone();
        Callback::from(move |_| show_password.set(!*show_password))
    };

    let toggle_confirm = {
        let show_confirm = show_confirm.clone();
        Callback::from(move |_| show_confirm.set(!*show_confirm))
    };

    let on_submit = {
        let form = form.clone();
        let loading = loading.clone();
        let error = error.clone();
        let success = success.clone();
        let navigator = navigator.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();

            let request = match validate_registration(&form) {
                Ok(request) => request,
                Err(message) => {
                    error.set(Some(message));
                    return;
                }
            };

            let loading = loading.clone();
            let error = error.clone();
            let success = success.clone();
            let navigator = navigator.clone();
            loading.set(true);
            error.set(None);

            wasm_bindgen_futures::spawn_local(async move {
                match ApiService::register(&request).await {
                    Ok(user) => {
                        tracing::info!("Registered {}", user.username);
                        success.set(Some(
                            "Registration successful! Redirecting to login...".to_string(),
                        ));
                        Timeout::new(REDIRECT_DELAY_MS, move || {
                            if let Some(navigator) = navigator {
                                navigator.push(&Route::Login);
                            }
                        })
                        .forget();
                    }
                    Err(e) => {
                        tracing::error!("Registration failed: {}", e);
                        error.set(Some(e.message));
                    }
                }
                loading.set(false);
            });
        })
    };

    let busy = *loading;
    let password_type = if *show_password { "text" } else { "password" };
    let confirm_type = if *show_confirm { "text" } else { "password" };

    html! {
        <div class="auth-container">
            <div class="auth-card">
                <div class="auth-header">
                    <h1>{"Create account"}</h1>
                    <p>{"Start your food diary"}</p>
                </div>

                <form class="auth-form" onsubmit={on_submit}>
                    {if let Some(err) = &*error {
                        html! { <div class="error-message">{err}</div> }
                    } else {
                        html! {}
                    }}
                    {if let Some(msg) = &*success {
                        html! { <div class="success-message">{msg}</div> }
                    } else {
                        html! {}
                    }}

                    <div class="form-group">
                        <label for="username">{"Username"}</label>
                        <input
                            type="text"
                            id="username"
                            value={form.username.clone()}
                            oninput={on_username}
                            placeholder="Choose a username"
                            required=true
                            disabled={busy}
                        />
                    </div>

                    <div class="form-group">
                        <label for="email">{"Email"}</label>
                        <input
                            type="email"
                            id="email"
                            value={form.email.clone()}
                            oninput={on_email}
                            placeholder="you@example.com"
                            required=true
                            disabled={busy}
                        />
                    </div>

                    <div class="form-group">
                        <label for="password">{"Password"}</label>
                        <div class="input-with-toggle">
                            <input
                                type={password_type}
                                id="password"
                                value={form.password.clone()}
                                oninput={on_password}
                                placeholder="At least 6 characters"
                                required=true
                                disabled={busy}
                            />
                            <button type="button" class="password-toggle" onclick={toggle_password} disabled={busy}>
                                {if *show_password { "Hide" } else { "Show" }}
                            </button>
                        </div>
                    </div>

                    <div class="form-group">
                        <label for="confirm-password">{"Confirm password"}</label>
                        <div class="input-with-toggle">
                            <input
                                type={confirm_type}
                                id="confirm-password"
                                value={form.confirm_password.clone()}
                                oninput={on_confirm}
                                placeholder="Repeat your password"
                                required=true
                                disabled={busy}
                            />
                            <button type="button" class="password-toggle" onclick={toggle_confirm} disabled={busy}>
                                {if *show_confirm { "Hide" } else { "Show" }}
                            </button>
                        </div>
                    </div>

                    <button type="submit" class="auth-button" disabled={busy}>
                        {if busy { "Registering..." } else { "Register" }}
                    </button>
                </form>

                <div class="auth-footer">
                    <p>
                        {"Already have an account? "}
                        <Link<Route> to={Route::Login} classes="auth-link">{"Sign in"}</Link<Route>>
                    </p>
                </div>
            </div>
        </div>
    }
}
