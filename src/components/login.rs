use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlInputElement;
use yew::prelude::*;
use yew_router::prelude::*;

use crate::command::CommandState;
use crate::model::Credentials;
use crate::req;
use crate::session::{SessionAction, SessionHandle};
use crate::Route;

#[function_component(Login)]
pub fn login() -> Html {
    let session = use_context::<SessionHandle>().expect("no session context");
    let navigator = use_navigator().unwrap();
    let username = use_state(String::new);
    let password = use_state(String::new);
    let state = use_state(CommandState::<()>::default);

    let on_username = {
        let username = username.clone();
        Callback::from(move |e: InputEvent| {
            username.set(e.target_unchecked_into::<HtmlInputElement>().value());
        })
    };
    let on_password = {
        let password = password.clone();
        Callback::from(move |e: InputEvent| {
            password.set(e.target_unchecked_into::<HtmlInputElement>().value());
        })
    };

    let onsubmit = {
        let session = session.clone();
        let navigator = navigator.clone();
        let username = username.clone();
        let password = password.clone();
        let state = state.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            if state.is_pending() {
                return;
            }
            let credentials = Credentials {
                username: (*username).clone(),
                password: (*password).clone(),
            };
            state.set(CommandState::Pending);
            let session = session.clone();
            let navigator = navigator.clone();
            let state = state.clone();
            spawn_local(async move {
                match req::login(&credentials).await {
                    Ok(resp) => {
                        session.dispatch(SessionAction::LoggedIn {
                            token: resp.token,
                            username: credentials.username,
                        });
                        state.set(CommandState::Settled(Ok(())));
                        navigator.push(&Route::Dashboard);
                    }
                    Err(err) => state.set(CommandState::Settled(Err(err.to_string()))),
                }
            });
        })
    };

    html! {
        <div class="auth-page">
            <div class="auth-card">
                <h1>{"Open Smart Irrigation"}</h1>
                <p class="muted">{"Sign in to your account"}</p>

                if let Some(error) = state.error() {
                    <div class="banner banner-error">{error}</div>
                }

                <form {onsubmit}>
                    <label for="username">{"Username"}</label>
                    <input id="username" type="text" value={(*username).clone()}
                        oninput={on_username} required={true} placeholder="Enter your username" />

                    <label for="password">{"Password"}</label>
                    <input id="password" type="password" value={(*password).clone()}
                        oninput={on_password} required={true} placeholder="Enter your password" />

                    <button type="submit" class="btn btn-primary btn-wide" disabled={state.is_pending()}>
                        { if state.is_pending() { "Signing In..." } else { "Sign In" } }
                    </button>
                </form>

                <p class="auth-switch">
                    <Link<Route> to={Route::Register}>{"No account? Register here"}</Link<Route>>
                </p>
            </div>
        </div>
    }
}
