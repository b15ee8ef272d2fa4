mod command;
mod components;
mod model;
mod req;
mod session;
mod sync;
mod utils;
mod validate;

use yew::prelude::*;
use yew_router::prelude::*;

use crate::session::{BrowserStorage, SessionHandle, SessionStore};

#[derive(Clone, Routable, PartialEq)]
pub enum Route {
    #[at("/login")]
    Login,
    #[at("/register")]
    Register,
    #[at("/dashboard")]
    Dashboard,
    #[at("/")]
    Home,
    #[not_found]
    #[at("/404")]
    NotFound,
}

#[derive(Properties, PartialEq)]
pub struct RequireAuthProps {
    pub children: Children,
}

/// Bounces unauthenticated visitors to the login form.
#[function_component(RequireAuth)]
fn require_auth(props: &RequireAuthProps) -> Html {
    let session = use_context::<SessionHandle>().expect("no session context");
    if session.is_authenticated() {
        html! { <>{ props.children.clone() }</> }
    } else {
        html! { <Redirect<Route> to={Route::Login} /> }
    }
}

fn switch(routes: Route) -> Html {
    match routes {
        Route::Login => html! { <components::login::Login /> },
        Route::Register => html! { <components::register::Register /> },
        Route::Dashboard => html! {
            <RequireAuth>
                <components::dashboard::Dashboard />
            </RequireAuth>
        },
        Route::Home => html! { <Redirect<Route> to={Route::Dashboard} /> },
        Route::NotFound => html! { <h1>{ "404" }</h1> },
    }
}

#[function_component(App)]
fn app() -> Html {
    // restored synchronously, so a stored token never flashes the login page
    let session = use_reducer(|| SessionStore::new(BrowserStorage).load());

    html! {
        <ContextProvider<SessionHandle> context={session}>
            <BrowserRouter>
                <Switch<Route> render={switch} />
            </BrowserRouter>
        </ContextProvider<SessionHandle>>
    }
}

fn main() {
    wasm_logger::init(wasm_logger::Config::default());
    yew::Renderer::<App>::new().render();
}
