use gloo_timers::future::TimeoutFuture;
use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlInputElement;
use yew::prelude::*;
use yew_router::prelude::*;

use crate::command::CommandState;
use crate::model::Credentials;
use crate::req;
use crate::Route;

const MIN_PASSWORD_LEN: usize = 6;

#[function_component(Register)]
pub fn register() -> Html {
    let navigator = use_navigator().unwrap();
    let username = use_state(String::new);
    let password = use_state(String::new);
    let confirm = use_state(String::new);
    let state = use_state(CommandState::<()>::default);

    let bind = |handle: &UseStateHandle<String>| {
        let handle = handle.clone();
        Callback::from(move |e: InputEvent| {
            handle.set(e.target_unchecked_into::<HtmlInputElement>().value());
        })
    };
    let on_username = bind(&username);
    let on_password = bind(&password);
    let on_confirm = bind(&confirm);

    let onsubmit = {
        let navigator = navigator.clone();
        let username = username.clone();
        let password = password.clone();
        let confirm = confirm.clone();
        let state = state.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            if state.is_pending() {
                return;
            }
            if *password != *confirm {
                state.set(CommandState::Settled(Err("Passwords do not match".to_owned())));
                return;
            }
            if password.len() < MIN_PASSWORD_LEN {
                state.set(CommandState::Settled(Err(
                    "Password must be at least 6 characters".to_owned(),
                )));
                return;
            }
            let credentials = Credentials {
                username: (*username).clone(),
                password: (*password).clone(),
            };
            state.set(CommandState::Pending);
            let navigator = navigator.clone();
            let state = state.clone();
            spawn_local(async move {
                match req::register(&credentials).await {
                    Ok(resp) if resp.success => {
                        state.set(CommandState::Settled(Ok(())));
                        // give the success card a moment before bouncing
                        TimeoutFuture::new(2_000).await;
                        navigator.push(&Route::Login);
                    }
                    Ok(_) => state.set(CommandState::Settled(Err(
                        "Registration failed. Please try again.".to_owned(),
                    ))),
                    Err(err) => state.set(CommandState::Settled(Err(err.to_string()))),
                }
            });
        })
    };

    if state.succeeded() {
        return html! {
            <div class="auth-page">
                <div class="auth-card center">
                    <h2>{"Success!"}</h2>
                    <p>{"Account created successfully. Redirecting to login..."}</p>
                </div>
            </div>
        };
    }

    html! {
        <div class="auth-page">
            <div class="auth-card">
                <h1>{"Create Account"}</h1>
                <p class="muted">{"Register for Open Smart Irrigation"}</p>

                if let Some(error) = state.error() {
                    <div class="banner banner-error">{error}</div>
                }

                <form {onsubmit}>
                    <label for="username">{"Username"}</label>
                    <input id="username" type="text" value={(*username).clone()}
                        oninput={on_username} required={true} placeholder="Choose a username" />

                    <label for="password">{"Password"}</label>
                    <input id="password" type="password" value={(*password).clone()}
                        oninput={on_password} required={true} placeholder="At least 6 characters" />

                    <label for="confirm">{"Confirm Password"}</label>
                    <input id="confirm" type="password" value={(*confirm).clone()}
                        oninput={on_confirm} required={true} placeholder="Repeat your password" />

                    <button type="submit" class="btn btn-primary btn-wide" disabled={state.is_pending()}>
                        { if state.is_pending() { "Creating Account..." } else { "Register" } }
                    </button>
                </form>

                <p class="auth-switch">
                    <Link<Route> to={Route::Login}>{"Already have an account? Sign in"}</Link<Route>>
                </p>
            </div>
        </div>
    }
}
