//! URL parsing and identity wrappers for repositories, pull requests, and
//! tokens.

use sha2::{Digest, Sha256};
use url::Url;

use super::error::IntakeError;

const GITHUB_API_BASE: &str = "https://api.github.com";

/// Repository owner wrapper to avoid stringly typed parameters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepositoryOwner(String);

impl RepositoryOwner {
    pub(crate) fn new(value: &str) -> Result<Self, IntakeError> {
        if value.is_empty() {
            return Err(IntakeError::MissingPathSegments);
        }
        Ok(Self(value.to_owned()))
    }

    /// Borrow the owner value.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Repository name wrapper to prevent parameter mix-ups.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepositoryName(String);

impl RepositoryName {
    pub(crate) fn new(value: &str) -> Result<Self, IntakeError> {
        if value.is_empty() {
            return Err(IntakeError::MissingPathSegments);
        }
        Ok(Self(value.to_owned()))
    }

    /// Borrow the repository name.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Pull request number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PullRequestNumber(u64);

impl PullRequestNumber {
    pub(crate) const fn new(value: u64) -> Result<Self, IntakeError> {
        if value == 0 {
            return Err(IntakeError::InvalidPullRequestNumber);
        }
        Ok(Self(value))
    }

    /// Returns the numeric value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// Personal access token wrapper enforcing presence.
///
/// `Debug` output is redacted.
#[derive(Clone, PartialEq, Eq)]
pub struct PersonalAccessToken(String);

impl PersonalAccessToken {
    /// Validates that the token is non-empty and trims whitespace.
    ///
    /// # Errors
    ///
    /// Returns `IntakeError::MissingToken` when the supplied string is blank.
    pub fn new(token: impl AsRef<str>) -> Result<Self, IntakeError> {
        let trimmed = token.as_ref().trim();
        if trimmed.is_empty() {
            return Err(IntakeError::MissingToken);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the token value.
    #[must_use]
    pub const fn value(&self) -> &str {
        self.0.as_str()
    }

    /// Hex SHA-256 of the token.
    ///
    /// Used wherever a token must identify cached data, so the secret itself
    /// never becomes a cache key or log field.
    #[must_use]
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.0.as_bytes());
        hex::encode(hasher.finalize())
    }
}

impl AsRef<str> for PersonalAccessToken {
    fn as_ref(&self) -> &str {
        self.value()
    }
}

impl std::fmt::Debug for PersonalAccessToken {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.write_str("PersonalAccessToken(<redacted>)")
    }
}

/// Returns the public GitHub API base URL.
///
/// # Errors
///
/// Never fails in practice; the error arm exists because URL parsing is
/// fallible.
pub fn default_api_base() -> Result<Url, IntakeError> {
    Url::parse(GITHUB_API_BASE).map_err(|error| IntakeError::InvalidUrl(error.to_string()))
}

/// Derives the GitHub API base URL from a host string.
fn derive_api_base_from_host(
    scheme: &str,
    host: &str,
    port: Option<u16>,
) -> Result<Url, IntakeError> {
    if host.eq_ignore_ascii_case("github.com") {
        default_api_base()
    } else {
        let authority = if host.contains(':') {
            format!("[{host}]")
        } else {
            host.to_owned()
        };
        let mut api_url = Url::parse(&format!("{scheme}://{authority}"))
            .map_err(|error| IntakeError::InvalidUrl(error.to_string()))?;

        api_url
            .set_port(port)
            .map_err(|()| IntakeError::InvalidUrl("invalid port".to_owned()))?;
        api_url.set_path("api/v3");
        Ok(api_url)
    }
}

/// Splits `/owner/repo/...` and derives the API base from the host.
fn parse_owner_repo_and_api<'url>(
    parsed: &'url Url,
) -> Result<
    (
        RepositoryOwner,
        RepositoryName,
        Url,
        std::str::Split<'url, char>,
    ),
    IntakeError,
> {
    let host = parsed
        .host_str()
        .ok_or_else(|| IntakeError::InvalidUrl("URL must include a host".to_owned()))?;

    let mut segments = parsed
        .path_segments()
        .ok_or(IntakeError::MissingPathSegments)?;

    let owner_segment = segments.next().ok_or(IntakeError::MissingPathSegments)?;
    let repository_segment = segments.next().ok_or(IntakeError::MissingPathSegments)?;

    let owner = RepositoryOwner::new(owner_segment)?;
    let repository = RepositoryName::new(repository_segment)?;
    let api_base = derive_api_base_from_host(parsed.scheme(), host, parsed.port())?;

    Ok((owner, repository, api_base, segments))
}

/// Parsed repository URL with derived API base.
///
/// # Example
///
/// ```
/// use revue::github::RepositoryLocator;
///
/// let locator = RepositoryLocator::parse("https://github.com/octo/repo")
///     .expect("should parse repository URL");
/// assert_eq!(locator.owner().as_str(), "octo");
/// assert_eq!(locator.repository().as_str(), "repo");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepositoryLocator {
    api_base: Url,
    owner: RepositoryOwner,
    repository: RepositoryName,
}

impl RepositoryLocator {
    /// Creates a repository locator on `github.com` from owner and name.
    ///
    /// # Errors
    ///
    /// Returns `IntakeError::MissingPathSegments` when owner or repo is empty.
    pub fn from_owner_repo(owner: &str, repo: &str) -> Result<Self, IntakeError> {
        Ok(Self {
            api_base: default_api_base()?,
            owner: RepositoryOwner::new(owner)?,
            repository: RepositoryName::new(repo)?,
        })
    }

    /// Parses a repository URL in the form `https://github.com/<owner>/<repo>`.
    ///
    /// Trailing path segments are ignored.
    ///
    /// # Errors
    ///
    /// Returns `IntakeError::InvalidUrl` when parsing fails or
    /// `MissingPathSegments` when the URL path is not `/owner/repo`.
    pub fn parse(input: &str) -> Result<Self, IntakeError> {
        let parsed =
            Url::parse(input).map_err(|error| IntakeError::InvalidUrl(error.to_string()))?;
        let (owner, repository, api_base, _rest) = parse_owner_repo_and_api(&parsed)?;

        Ok(Self {
            api_base,
            owner,
            repository,
        })
    }

    /// API base URL derived from the repository host.
    #[must_use]
    pub const fn api_base(&self) -> &Url {
        &self.api_base
    }

    /// Repository owner.
    #[must_use]
    pub const fn owner(&self) -> &RepositoryOwner {
        &self.owner
    }

    /// Repository name.
    #[must_use]
    pub const fn repository(&self) -> &RepositoryName {
        &self.repository
    }

    /// `host/owner/repo`, used to namespace cache keys per GitHub instance.
    #[must_use]
    pub fn slug(&self) -> String {
        format!(
            "{}/{}/{}",
            self.api_base.host_str().unwrap_or_default(),
            self.owner.as_str(),
            self.repository.as_str()
        )
    }

    pub(crate) fn pulls_path(&self) -> String {
        format!(
            "/repos/{}/{}/pulls",
            self.owner.as_str(),
            self.repository.as_str()
        )
    }
}

/// Parsed pull request URL and derived API base.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PullRequestLocator {
    repository: RepositoryLocator,
    number: PullRequestNumber,
}

impl PullRequestLocator {
    /// Parses a GitHub pull request URL in the form
    /// `https://github.com/<owner>/<repo>/pull/<number>`.
    ///
    /// # Errors
    ///
    /// Returns `IntakeError::InvalidUrl` when parsing fails, `MissingPathSegments`
    /// when the URL path is not `/owner/repo/pull/<number>`, and
    /// `InvalidPullRequestNumber` when the final segment is not a positive
    /// integer.
    pub fn parse(input: &str) -> Result<Self, IntakeError> {
        let parsed =
            Url::parse(input).map_err(|error| IntakeError::InvalidUrl(error.to_string()))?;
        let (owner, repository, api_base, mut rest) = parse_owner_repo_and_api(&parsed)?;

        let marker = rest.next().ok_or(IntakeError::MissingPathSegments)?;
        let number_segment = rest.next().ok_or(IntakeError::MissingPathSegments)?;

        if marker != "pull" || number_segment.is_empty() {
            return Err(IntakeError::MissingPathSegments);
        }

        let number = number_segment
            .parse::<u64>()
            .map_err(|_| IntakeError::InvalidPullRequestNumber)
            .and_then(PullRequestNumber::new)?;

        Ok(Self {
            repository: RepositoryLocator {
                api_base,
                owner,
                repository,
            },
            number,
        })
    }

    /// Creates a locator for pull request `number` in `repository`.
    ///
    /// # Errors
    ///
    /// Returns `IntakeError::InvalidPullRequestNumber` when `number` is zero.
    pub fn new(repository: RepositoryLocator, number: u64) -> Result<Self, IntakeError> {
        Ok(Self {
            repository,
            number: PullRequestNumber::new(number)?,
        })
    }

    /// The repository holding the pull request.
    #[must_use]
    pub const fn repository_locator(&self) -> &RepositoryLocator {
        &self.repository
    }

    /// API base URL derived from the pull request host.
    #[must_use]
    pub const fn api_base(&self) -> &Url {
        self.repository.api_base()
    }

    /// Repository owner.
    #[must_use]
    pub const fn owner(&self) -> &RepositoryOwner {
        self.repository.owner()
    }

    /// Repository name.
    #[must_use]
    pub const fn repository(&self) -> &RepositoryName {
        self.repository.repository()
    }

    /// Pull request number.
    #[must_use]
    pub const fn number(&self) -> PullRequestNumber {
        self.number
    }

    /// `host/owner/repo#number`, used to namespace cache keys.
    #[must_use]
    pub fn slug(&self) -> String {
        format!("{}#{}", self.repository.slug(), self.number.get())
    }

    pub(crate) fn pull_request_path(&self) -> String {
        format!("{}/{}", self.repository.pulls_path(), self.number.get())
    }

    pub(crate) fn files_path(&self) -> String {
        format!("{}/files", self.pull_request_path())
    }
}
