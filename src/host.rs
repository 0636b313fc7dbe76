//! Services of the hosting cloud platform the listeners depend on.
//!
//! The traits describe the read-only views the listeners need. The plain implementations
//! are enough to run the relay outside a host.

use crate::Error;
use std::collections::HashMap;
use std::fmt::{Debug, Display, Formatter};
use std::sync::{PoisonError, RwLock};
use std::time::SystemTime;
use url::Url;

/// Route of the public page of a share, parameterized by `token`.
pub const ROUTE_SHOW_SHARE: &str = "files_sharing.sharecontroller.showShare";

const DEFAULT_SHOW_SHARE_PATH: &str = "/index.php/s/{token}";

/// Kind of recipient a share was created for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShareType {
    /// A single user.
    User,
    /// A group.
    Group,
    /// A user inside a group share.
    UserGroup,
    /// A public link.
    Link,
    /// An email address.
    Email,
    /// A user on a federated server.
    Remote,
    /// A circle.
    Circle,
    /// A guest user.
    Guest,
    /// A group on a federated server.
    RemoteGroup,
    /// A talk room.
    Room,
    /// A deck board.
    Deck,
    /// A ScienceMesh user.
    ScienceMesh,
}

impl ShareType {
    /// Numeric code of the share type as used by the host.
    pub fn code(&self) -> u8 {
        match self {
            ShareType::User => 0,
            ShareType::Group => 1,
            ShareType::UserGroup => 2,
            ShareType::Link => 3,
            ShareType::Email => 4,
            ShareType::Remote => 6,
            ShareType::Circle => 7,
            ShareType::Guest => 8,
            ShareType::RemoteGroup => 9,
            ShareType::Room => 10,
            ShareType::Deck => 12,
            ShareType::ScienceMesh => 15,
        }
    }
}

impl TryFrom<u8> for ShareType {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(ShareType::User),
            1 => Ok(ShareType::Group),
            2 => Ok(ShareType::UserGroup),
            3 => Ok(ShareType::Link),
            4 => Ok(ShareType::Email),
            6 => Ok(ShareType::Remote),
            7 => Ok(ShareType::Circle),
            8 => Ok(ShareType::Guest),
            9 => Ok(ShareType::RemoteGroup),
            10 => Ok(ShareType::Room),
            12 => Ok(ShareType::Deck),
            15 => Ok(ShareType::ScienceMesh),
            other => Err(Error::InvalidArgument(format!("unknown share type {}", other))),
        }
    }
}

impl Display for ShareType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Read-only view of a share.
pub trait Share: Send + Sync + Debug {
    /// Return the kind of recipient.
    fn share_type(&self) -> ShareType;

    /// Return the id of the user who created the share.
    fn shared_by(&self) -> &str;

    /// Return the recipient, an email address for [`ShareType::Email`].
    fn shared_with(&self) -> &str;

    /// Return the note left for the recipient.
    fn note(&self) -> Option<&str>;

    /// Return when the share expires.
    fn expiration_date(&self) -> Option<SystemTime>;

    /// Return the share token.
    fn token(&self) -> &str;

    /// Look up the name of the shared file or folder.
    ///
    /// Fails with [`Error::NotFound`] once the node is gone.
    fn node_name(&self) -> Result<String, Error>;
}

/// A user known to the host.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct User {
    uid: String,
}

/// User directory of the host.
pub trait UserManager: Send + Sync {
    /// Return the user with id `uid`.
    fn get(&self, uid: &str) -> Option<User>;
}

/// Localization of the current request.
pub trait L10n: Send + Sync {
    /// Return the current language code.
    fn language_code(&self) -> String;
}

/// Generation of links to host routes.
pub trait UrlGenerator: Send + Sync {
    /// Build an absolute URL for `route` with `params` filled in.
    fn link_to_route_absolute(&self, route: &str, params: &[(&str, &str)]) -> Result<String, Error>;
}

impl User {
    /// Create a new `User`.
    pub fn new<S: AsRef<str>>(uid: S) -> Self {
        Self { uid: uid.as_ref().into() }
    }

    /// Return the user id.
    pub fn uid(&self) -> &str {
        &self.uid
    }
}

/// [`Share`] backed by plain values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareRecord {
    share_type: ShareType,
    shared_by: String,
    shared_with: String,
    note: Option<String>,
    expiration_date: Option<SystemTime>,
    token: String,
    node_name: Option<String>,
}

impl ShareRecord {
    /// Create a new `ShareRecord` without note, expiration or node.
    pub fn new<S: AsRef<str>>(share_type: ShareType, shared_by: S, shared_with: S, token: S) -> Self {
        Self {
            share_type,
            shared_by: shared_by.as_ref().into(),
            shared_with: shared_with.as_ref().into(),
            note: None,
            expiration_date: None,
            token: token.as_ref().into(),
            node_name: None,
        }
    }

    /// Set the note.
    pub fn with_note<S: AsRef<str>>(mut self, note: S) -> Self {
        self.note = Some(note.as_ref().into());
        self
    }

    /// Set the expiration date.
    pub fn with_expiration_date(mut self, expiration_date: SystemTime) -> Self {
        self.expiration_date = Some(expiration_date);
        self
    }

    /// Set the name of the shared node.
    pub fn with_node_name<S: AsRef<str>>(mut self, node_name: S) -> Self {
        self.node_name = Some(node_name.as_ref().into());
        self
    }
}

impl Share for ShareRecord {
    fn share_type(&self) -> ShareType {
        self.share_type
    }

    fn shared_by(&self) -> &str {
        &self.shared_by
    }

    fn shared_with(&self) -> &str {
        &self.shared_with
    }

    fn note(&self) -> Option<&str> {
        self.note.as_deref()
    }

    fn expiration_date(&self) -> Option<SystemTime> {
        self.expiration_date
    }

    fn token(&self) -> &str {
        &self.token
    }

    fn node_name(&self) -> Result<String, Error> {
        self.node_name.clone().ok_or_else(|| Error::NotFound("node not found".to_string()))
    }
}

/// [`UserManager`] kept in memory.
#[derive(Debug, Default)]
pub struct MemoryUserManager {
    users: RwLock<HashMap<String, User>>,
}

impl MemoryUserManager {
    /// Create an empty `MemoryUserManager`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a user.
    pub fn insert(&self, user: User) {
        let mut users = self.users.write().unwrap_or_else(PoisonError::into_inner);
        users.insert(user.uid().to_string(), user);
    }
}

impl UserManager for MemoryUserManager {
    fn get(&self, uid: &str) -> Option<User> {
        let users = self.users.read().unwrap_or_else(PoisonError::into_inner);
        users.get(uid).cloned()
    }
}

/// [`L10n`] always answering the same language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedL10n {
    language: String,
}

impl FixedL10n {
    /// Create a new `FixedL10n`.
    pub fn new<S: AsRef<str>>(language: S) -> Self {
        Self { language: language.as_ref().into() }
    }
}

impl L10n for FixedL10n {
    fn language_code(&self) -> String {
        self.language.clone()
    }
}

/// [`UrlGenerator`] resolving routes from path templates such as `/s/{token}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteUrlGenerator {
    base_url: Url,
    routes: HashMap<String, String>,
}

impl RouteUrlGenerator {
    /// Create a new `RouteUrlGenerator` knowing the share route.
    pub fn new(base_url: Url) -> Self {
        let mut routes = HashMap::new();
        routes.insert(ROUTE_SHOW_SHARE.to_string(), DEFAULT_SHOW_SHARE_PATH.to_string());
        Self { base_url, routes }
    }

    /// Register or replace the path template of `route`.
    pub fn with_route<S: AsRef<str>>(mut self, route: S, template: S) -> Self {
        self.routes.insert(route.as_ref().into(), template.as_ref().into());
        self
    }
}

impl UrlGenerator for RouteUrlGenerator {
    fn link_to_route_absolute(&self, route: &str, params: &[(&str, &str)]) -> Result<String, Error> {
        let template = self.routes.get(route).ok_or_else(|| Error::NotFound(format!("unknown route {}", route)))?;

        let mut url = self.base_url.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| Error::InvalidArgument(format!("base url '{}' can not be a base", self.base_url)))?;
            segments.pop_if_empty();

            for segment in template.split('/').filter(|segment| !segment.is_empty()) {
                let value = match segment.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
                    Some(name) => params
                        .iter()
                        .find(|(key, _)| *key == name)
                        .map(|(_, value)| *value)
                        .ok_or_else(|| Error::InvalidArgument(format!("missing route parameter {}", name)))?,
                    None => segment,
                };
                segments.push(value);
            }
        }

        Ok(url.to_string())
    }
}
