use shared_types::UserProfile;
use std::rc::Rc;
use yew::prelude::*;

use crate::services::storage;

/// Who is signed in, if anyone.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuthState {
    pub token: Option<String>,
    pub user: Option<UserProfile>,
}

impl AuthState {
    /// Restore the session persisted by a previous page load.
    pub fn from_storage() -> Self {
        Self {
            token: storage::get_token(),
            user: storage::get_user(),
        }
    }

    /// A half-restored session (token without user or the reverse) counts
    /// as signed out.
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some() && self.user.is_some()
    }
}

pub enum AuthAction {
    Login { token: String, user: UserProfile },
    Logout,
    UpdateUser(UserProfile),
}

impl Reducible for AuthState {
    type Action = AuthAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        match action {
            AuthAction::Login { token, user } => Rc::new(AuthState {
                token: Some(token),
                user: Some(user),
            }),
            AuthAction::Logout => Rc::new(AuthState::default()),
            AuthAction::UpdateUser(user) => Rc::new(AuthState {
                token: self.token.clone(),
                user: Some(user),
            }),
        }
    }
}

/// Handle shared through the component tree. Every mutation is mirrored to
/// local storage so a reload keeps the session.
#[derive(Clone, PartialEq)]
pub struct AuthContext {
    state: UseReducerHandle<AuthState>,
}

impl AuthContext {
    pub fn user(&self) -> Option<&UserProfile> {
        self.state.user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.is_authenticated()
    }

    pub fn login(&self, token: String, user: UserProfile) {
        storage::set_token(&token);
        storage::set_user(&user);
        tracing::info!("Signed in as {}", user.username);
        self.state.dispatch(AuthAction::Login { token, user });
    }

    pub fn logout(&self) {
        storage::clear_auth();
        tracing::info!("Signed out");
        self.state.dispatch(AuthAction::Logout);
    }

    pub fn update_user(&self, user: UserProfile) {
        storage::set_user(&user);
        self.state.dispatch(AuthAction::UpdateUser(user));
    }
}

#[derive(Properties, PartialEq)]
pub struct AuthProviderProps {
    #[prop_or_default]
    pub children: Html,
}

#[function_component(AuthProvider)]
pub fn auth_provider(props: &AuthProviderProps) -> Html {
    let state = use_reducer(AuthState::from_storage);
    let context = AuthContext { state };

    html! {
        <ContextProvider<AuthContext> context={context}>
            {props.children.clone()}
        </ContextProvider<AuthContext>>
    }
}

/// Auth handle for the current component. Panics outside an `AuthProvider`,
/// which only happens if the app root is wired wrong.
#[hook]
pub fn use_auth() -> AuthContext {
    use_context::<AuthContext>().expect("use_auth called outside AuthProvider")
}
