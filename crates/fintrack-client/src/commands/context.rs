use std::path::Path;
use std::rc::Rc;

use chrono::NaiveDate;
use tokio::sync::broadcast;

use crate::auth::{AuthBackend, LocalAuth, TableAuth};
use crate::config::{Backend, Config};
use crate::models::{Session, User, UserId};
use crate::session::{Navigation, Route, SessionGuard};
use crate::setup::{SetupContext, ensure_initialized};
use crate::store::{
    Change, ChangeEvent, ChangeFeed, Collection, Database, LocalRecordStore, RecordStore,
    SqliteKeyValueStore, StoredRecord, TableRecordStore,
};
use crate::{ClientError, ClientResult};

type SharedKv = Rc<SqliteKeyValueStore>;

/// Settings shared by every command.
#[derive(Debug, Default, Clone, Copy)]
pub struct CommandOptions<'a> {
    pub home_override: Option<&'a Path>,
    pub backend: Option<Backend>,
    /// Pins "today" for date defaults and series; the local date otherwise.
    pub today: Option<NaiveDate>,
}

impl CommandOptions<'_> {
    pub fn today(&self) -> NaiveDate {
        self.today
            .unwrap_or_else(|| chrono::Local::now().date_naive())
    }
}

#[derive(Debug)]
pub enum AnyAuth {
    Local(LocalAuth<SharedKv>),
    Tables(TableAuth<SharedKv>),
}

impl AuthBackend for AnyAuth {
    fn register(&self, name: &str, email: &str, password_hash: &str) -> ClientResult<User> {
        match self {
            Self::Local(auth) => auth.register(name, email, password_hash),
            Self::Tables(auth) => auth.register(name, email, password_hash),
        }
    }

    fn find_user_by_email(&self, email: &str) -> ClientResult<Option<User>> {
        match self {
            Self::Local(auth) => auth.find_user_by_email(email),
            Self::Tables(auth) => auth.find_user_by_email(email),
        }
    }

    fn find_user(&self, user_id: UserId) -> ClientResult<Option<User>> {
        match self {
            Self::Local(auth) => auth.find_user(user_id),
            Self::Tables(auth) => auth.find_user(user_id),
        }
    }

    fn update_user(&self, user: &User) -> ClientResult<()> {
        match self {
            Self::Local(auth) => auth.update_user(user),
            Self::Tables(auth) => auth.update_user(user),
        }
    }

    fn delete_user(&self, user_id: UserId) -> ClientResult<()> {
        match self {
            Self::Local(auth) => auth.delete_user(user_id),
            Self::Tables(auth) => auth.delete_user(user_id),
        }
    }

    fn start_session(&self, user: &User) -> ClientResult<Session> {
        match self {
            Self::Local(auth) => auth.start_session(user),
            Self::Tables(auth) => auth.start_session(user),
        }
    }

    fn refresh_session(&self, user: &User) -> ClientResult<Session> {
        match self {
            Self::Local(auth) => auth.refresh_session(user),
            Self::Tables(auth) => auth.refresh_session(user),
        }
    }

    fn current_session(&self) -> ClientResult<Option<Session>> {
        match self {
            Self::Local(auth) => auth.current_session(),
            Self::Tables(auth) => auth.current_session(),
        }
    }

    fn has_stored_session(&self) -> ClientResult<bool> {
        match self {
            Self::Local(auth) => auth.has_stored_session(),
            Self::Tables(auth) => auth.has_stored_session(),
        }
    }

    fn clear_session(&self) -> ClientResult<()> {
        match self {
            Self::Local(auth) => auth.clear_session(),
            Self::Tables(auth) => auth.clear_session(),
        }
    }
}

#[derive(Debug)]
pub enum AnyStore {
    Local(LocalRecordStore<SharedKv>),
    Tables(TableRecordStore),
}

impl RecordStore for AnyStore {
    fn list<R: StoredRecord>(&self, user_id: UserId) -> ClientResult<Vec<R>> {
        match self {
            Self::Local(store) => store.list(user_id),
            Self::Tables(store) => store.list(user_id),
        }
    }

    fn apply<R: StoredRecord>(
        &self,
        user_id: UserId,
        current: &[R],
        change: &Change<R>,
    ) -> ClientResult<Vec<R>> {
        match self {
            Self::Local(store) => store.apply(user_id, current, change),
            Self::Tables(store) => store.apply(user_id, current, change),
        }
    }

    fn ensure_collection(&self, user_id: UserId, collection: Collection) -> ClientResult<()> {
        match self {
            Self::Local(store) => store.ensure_collection(user_id, collection),
            Self::Tables(store) => store.ensure_collection(user_id, collection),
        }
    }

    fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        match self {
            Self::Local(store) => store.subscribe(),
            Self::Tables(store) => store.subscribe(),
        }
    }
}

/// Auth and record store wired for the configured backend.
#[derive(Debug)]
pub struct Workspace {
    pub setup: SetupContext,
    pub auth: AnyAuth,
    pub store: AnyStore,
}

impl Workspace {
    pub fn open(options: &CommandOptions<'_>) -> ClientResult<Self> {
        let config = Config::from_env()?
            .with_home(options.home_override.map(Path::to_path_buf))
            .with_backend(options.backend);
        let setup = ensure_initialized(&config)?;
        let db = Rc::new(Database::open(&setup)?);
        let kv = Rc::new(SqliteKeyValueStore::new(Rc::clone(&db)));
        let feed = ChangeFeed::default();

        let (auth, store) = match setup.backend {
            Backend::Local => (
                AnyAuth::Local(LocalAuth::new(Rc::clone(&kv))),
                AnyStore::Local(LocalRecordStore::new(kv, feed)),
            ),
            Backend::Tables => (
                AnyAuth::Tables(TableAuth::new(Rc::clone(&db), kv)),
                AnyStore::Tables(TableRecordStore::new(db, feed)),
            ),
        };
        Ok(Self { setup, auth, store })
    }

    pub fn backend(&self) -> Backend {
        self.setup.backend
    }

    pub fn navigate(&self, route: Route) -> Navigation {
        SessionGuard::new(&self.auth).check(route)
    }

    /// The session for a protected route, or `session_required` naming the redirect.
    pub fn require(&self, route: Route) -> ClientResult<Session> {
        match self.navigate(route) {
            Navigation::Allow {
                session: Some(session),
                ..
            } => Ok(session),
            Navigation::Allow { route, .. } => Err(ClientError::session_required(
                route.path(),
                Route::Auth.path(),
            )),
            Navigation::Redirect { from, to } => {
                Err(ClientError::session_required(from.path(), to.path()))
            }
        }
    }
}
