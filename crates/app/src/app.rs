//! The app controller.
//!
//! Owns the navigator, the screen controllers, and the latest product
//! snapshot, and reacts to [`AppEvent`]s. Backend calls run in spawned
//! tasks that report back over the event channel, so handling an event
//! never blocks on the network.

use std::sync::Arc;

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use punguin_client::{ProductStore, SessionStore};
use punguin_core::{OwnerId, Product, ProductFields, ProductKey, Session};

use crate::event::{AppEvent, WriteAction};
use crate::navigator::{AppScreen, AuthScreen, NavState, Navigator};
use crate::picker::ImageGallery;
use crate::screens::{CredentialsForm, HomeScreen, Notice, ProductForm};
use crate::viewmodel::ProductListViewModel;

/// Builds the product store for a freshly established session.
///
/// Each session gets its own store so requests carry that session's
/// credential.
pub type StoreFactory = Box<dyn Fn(&Session) -> Arc<dyn ProductStore> + Send + Sync>;

pub struct App {
    session_store: Arc<SessionStore>,
    make_store: StoreFactory,
    gallery: ImageGallery,
    tx: mpsc::UnboundedSender<AppEvent>,

    pub navigator: Navigator,
    pub credentials: CredentialsForm,
    pub home: HomeScreen,
    pub product_form: ProductForm,
    /// Latest subscription snapshot; the only data the list renders.
    pub products: Vec<Product>,

    store: Option<Arc<dyn ProductStore>>,
    subscription_task: Option<JoinHandle<()>>,
    pub should_quit: bool,
}

impl App {
    pub fn new(
        session_store: Arc<SessionStore>,
        make_store: StoreFactory,
        gallery: ImageGallery,
        tx: mpsc::UnboundedSender<AppEvent>,
    ) -> Self {
        Self {
            session_store,
            make_store,
            gallery,
            tx,
            navigator: Navigator::new(),
            credentials: CredentialsForm::new(),
            home: HomeScreen::new(),
            product_form: ProductForm::new(),
            products: Vec::new(),
            store: None,
            subscription_task: None,
            should_quit: false,
        }
    }

    /// React to one event from the channel.
    pub fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Input(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                self.handle_key(key);
            }
            AppEvent::Input(_) => {}
            AppEvent::SessionChanged(session) => self.handle_session_change(session),
            AppEvent::Products(snapshot) => {
                self.products = snapshot;
            }
            AppEvent::AuthDone(result) => self.credentials.complete(result),
            AppEvent::WriteDone { action, result } => self.handle_write_done(action, result),
            AppEvent::SubscriptionFailed(message) => {
                self.home.notice = Some(Notice::Error(message));
            }
        }
    }

    // =========================================================================
    // Session lifecycle
    // =========================================================================

    fn handle_session_change(&mut self, session: Option<Session>) {
        if let Some(task) = self.subscription_task.take() {
            task.abort();
        }

        match session {
            Some(session) => {
                self.navigator.session_appeared(&session);
                self.credentials.clear();
                self.home = HomeScreen::new();
                self.products.clear();

                let store = (self.make_store)(&session);
                self.store = Some(Arc::clone(&store));
                self.subscription_task =
                    Some(spawn_subscription(store, session.uid.clone(), self.tx.clone()));
            }
            None => {
                self.navigator.session_ended();
                self.store = None;
                self.products.clear();
            }
        }
    }

    // =========================================================================
    // Key dispatch
    // =========================================================================

    fn handle_key(&mut self, key: KeyEvent) {
        match self.navigator.state().clone() {
            NavState::Unauthenticated(screen) => self.handle_auth_key(screen, key),
            NavState::Authenticated { owner, screen } => match screen {
                AppScreen::Home => self.handle_home_key(&owner.uid, key),
                AppScreen::AddProduct => self.handle_form_key(&owner.uid, None, key),
                AppScreen::EditProduct(product) => {
                    self.handle_form_key(&owner.uid, Some(product.key), key);
                }
            },
        }
    }

    fn handle_auth_key(&mut self, screen: AuthScreen, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            if key.code == KeyCode::Char('t') {
                // Switch between sign-in and sign-up.
                self.navigator.toggle_auth();
                self.credentials.clear();
            }
            return;
        }

        match key.code {
            KeyCode::Esc => self.should_quit = true,
            KeyCode::Tab => self.credentials.toggle_focus(),
            KeyCode::Backspace => self.credentials.backspace(),
            KeyCode::Enter => {
                if let Some((email, password)) = self.credentials.begin_submit() {
                    self.spawn_auth(screen, email, password);
                }
            }
            KeyCode::Char(ch) => self.credentials.insert_char(ch),
            _ => {}
        }
    }

    fn handle_home_key(&mut self, uid: &OwnerId, key: KeyEvent) {
        // A pending delete captures the keyboard until resolved.
        if self.home.pending_delete.is_some() {
            match key.code {
                KeyCode::Char('y') => {
                    if let Some(product_key) = self.home.begin_delete() {
                        self.spawn_write(uid.clone(), WriteAction::Delete, product_key, None);
                    }
                }
                KeyCode::Char('n') | KeyCode::Esc => self.home.cancel_delete(),
                _ => {}
            }
            return;
        }

        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('n') => {
                    self.product_form = ProductForm::new();
                    self.navigator.open_add();
                }
                KeyCode::Char('l') => {
                    if let Err(err) = self.session_store.sign_out() {
                        self.home.notice = Some(Notice::Error(err.to_string()));
                    }
                }
                _ => {}
            }
            return;
        }

        match key.code {
            KeyCode::Esc => self.should_quit = true,
            KeyCode::Up => {
                let len = self.home.view.displayed(&self.products).len();
                self.home.move_selection(len, false);
            }
            KeyCode::Down => {
                let len = self.home.view.displayed(&self.products).len();
                self.home.move_selection(len, true);
            }
            KeyCode::Left | KeyCode::Right => {
                let labels = ProductListViewModel::categories(&self.products);
                self.home.cycle_category(&labels, key.code == KeyCode::Right);
            }
            KeyCode::Enter => {
                let displayed = self.home.view.displayed(&self.products);
                if let Some(product) = self.home.selected_product(&displayed) {
                    let product = product.clone();
                    self.product_form = ProductForm::for_product(&product);
                    self.navigator.open_edit(product);
                }
            }
            KeyCode::Delete => {
                let displayed = self.home.view.displayed(&self.products);
                self.home.request_delete(&displayed);
            }
            KeyCode::Backspace => self.home.search_backspace(),
            KeyCode::Char(ch) => self.home.search_char(ch),
            _ => {}
        }
    }

    fn handle_form_key(&mut self, uid: &OwnerId, editing: Option<ProductKey>, key: KeyEvent) {
        // The picker overlay captures the keyboard while open.
        if self.product_form.gallery.is_some() {
            match key.code {
                KeyCode::Esc => self.product_form.cancel_gallery(),
                KeyCode::Up => self.product_form.gallery_move(false),
                KeyCode::Down => self.product_form.gallery_move(true),
                KeyCode::Enter => self.product_form.pick_highlighted(),
                _ => {}
            }
            return;
        }

        match key.code {
            KeyCode::Esc => {
                self.navigator.back_home();
            }
            KeyCode::Tab => self.product_form.focus_next(),
            KeyCode::BackTab => self.product_form.focus_previous(),
            KeyCode::Left | KeyCode::Right
                if self.product_form.focus == crate::screens::ProductFormField::Category =>
            {
                self.product_form.cycle_category(key.code == KeyCode::Right);
            }
            KeyCode::Enter => {
                if self.product_form.focus == crate::screens::ProductFormField::Image {
                    self.open_gallery();
                } else if let Some(fields) = self.product_form.begin_submit() {
                    match editing {
                        Some(product_key) => self.spawn_write(
                            uid.clone(),
                            WriteAction::Update,
                            product_key,
                            Some(fields),
                        ),
                        None => self.spawn_create(uid.clone(), fields),
                    }
                }
            }
            KeyCode::Backspace => self.product_form.backspace(),
            KeyCode::Char(ch) => self.product_form.insert_char(ch),
            _ => {}
        }
    }

    fn open_gallery(&mut self) {
        match self.gallery.request_access().and_then(|()| self.gallery.entries()) {
            Ok(entries) => self.product_form.open_gallery(entries),
            Err(err) => {
                warn!(error = %err, "gallery unavailable");
                self.product_form.notice = Some(Notice::Error(err.to_string()));
            }
        }
    }

    // =========================================================================
    // Spawned backend calls
    // =========================================================================

    fn spawn_auth(&self, screen: AuthScreen, email: String, password: String) {
        let session_store = Arc::clone(&self.session_store);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = match screen {
                AuthScreen::SignIn => session_store.sign_in(&email, &password).await,
                AuthScreen::SignUp => session_store.sign_up(&email, &password).await,
            };
            // Session changes travel separately through the watcher.
            let outcome = result.map(|_| ()).map_err(|e| e.to_string());
            let _ = tx.send(AppEvent::AuthDone(outcome));
        });
    }

    fn spawn_create(&self, uid: OwnerId, fields: ProductFields) {
        let Some(store) = self.store.clone() else {
            return;
        };
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = store
                .create(&uid, &fields)
                .await
                .map(|key| info!(key = %key, "product created"))
                .map_err(|e| e.to_string());
            let _ = tx.send(AppEvent::WriteDone {
                action: WriteAction::Create,
                result,
            });
        });
    }

    fn spawn_write(
        &self,
        uid: OwnerId,
        action: WriteAction,
        key: ProductKey,
        fields: Option<ProductFields>,
    ) {
        let Some(store) = self.store.clone() else {
            return;
        };
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = match (&action, fields) {
                (WriteAction::Update, Some(fields)) => store.update(&uid, &key, &fields).await,
                _ => store.remove(&uid, &key).await,
            };
            let _ = tx.send(AppEvent::WriteDone {
                action,
                result: result.map_err(|e| e.to_string()),
            });
        });
    }

    fn handle_write_done(&mut self, action: WriteAction, result: Result<(), String>) {
        match action {
            WriteAction::Create | WriteAction::Update => {
                let succeeded = result.is_ok();
                self.product_form.complete(result);
                if succeeded {
                    // Back to Home as soon as the write lands; the list
                    // catches up on the next subscription snapshot.
                    self.navigator.back_home();
                    self.home.notice = Some(Notice::Success(
                        match action {
                            WriteAction::Create => "product added",
                            _ => "product updated",
                        }
                        .to_owned(),
                    ));
                }
            }
            WriteAction::Delete => self.home.complete_delete(result),
        }
    }
}

/// Feed subscription snapshots into the app channel until aborted.
fn spawn_subscription(
    store: Arc<dyn ProductStore>,
    owner: OwnerId,
    tx: mpsc::UnboundedSender<AppEvent>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut subscription = match store.subscribe(&owner).await {
            Ok(sub) => sub,
            Err(err) => {
                error!(error = %err, "product subscription failed");
                let _ = tx.send(AppEvent::SubscriptionFailed(err.to_string()));
                return;
            }
        };

        if tx.send(AppEvent::Products(subscription.snapshot())).is_err() {
            return;
        }
        while let Some(snapshot) = subscription.changed().await {
            if tx.send(AppEvent::Products(snapshot)).is_err() {
                break;
            }
        }
    })
}
