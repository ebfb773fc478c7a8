//! Region binding for provider clients.
//!
//! A provider client starts on the provider's default region. The
//! [`RegionBinder`] applies a configured region to it at most once. An
//! unrecognized region name is logged and ignored so that a typo in the
//! configuration does not stop workers from being provisioned.

use std::sync::{Mutex, MutexGuard, PoisonError, TryLockError};

use thiserror::Error;
use tracing::{debug, info, warn};

/// Region name errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegionError {
    #[error("unknown region: {0:?}")]
    UnknownRegion(String),
}

macro_rules! regions {
    ($($variant:ident => $name:literal),+ $(,)?) => {
        /// Regions the provider recognizes.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub enum Region {
            $($variant),+
        }

        impl Region {
            /// Every recognized region.
            pub const ALL: &'static [Region] = &[$(Region::$variant),+];

            /// Canonical region name, e.g. `us-west-2`.
            pub const fn name(&self) -> &'static str {
                match self {
                    $(Region::$variant => $name),+
                }
            }

            /// Parse a canonical region name.
            pub fn from_name(name: &str) -> Result<Self, RegionError> {
                match name {
                    $($name => Ok(Region::$variant),)+
                    _ => Err(RegionError::UnknownRegion(name.to_string())),
                }
            }
        }
    };
}

regions! {
    UsGovWest1 => "us-gov-west-1",
    UsGovEast1 => "us-gov-east-1",
    UsEast1 => "us-east-1",
    UsEast2 => "us-east-2",
    UsWest1 => "us-west-1",
    UsWest2 => "us-west-2",
    CaCentral1 => "ca-central-1",
    SaEast1 => "sa-east-1",
    EuWest1 => "eu-west-1",
    EuWest2 => "eu-west-2",
    EuWest3 => "eu-west-3",
    EuCentral1 => "eu-central-1",
    EuNorth1 => "eu-north-1",
    ApSouth1 => "ap-south-1",
    ApSoutheast1 => "ap-southeast-1",
    ApSoutheast2 => "ap-southeast-2",
    ApNortheast1 => "ap-northeast-1",
    ApNortheast2 => "ap-northeast-2",
    ApNortheast3 => "ap-northeast-3",
    CnNorth1 => "cn-north-1",
    CnNorthwest1 => "cn-northwest-1",
}

impl std::fmt::Display for Region {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for Region {
    type Err = RegionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s)
    }
}

/// A provider client whose region can be changed after construction.
pub trait RegionalClient: Send {
    /// Point the client at `region`.
    fn set_region(&mut self, region: Region);

    /// Region in use, or `None` for the provider default.
    fn region(&self) -> Option<Region>;
}

/// Client that only records its region. Used for offline checks and tests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DryRunClient {
    region: Option<Region>,
    set_region_calls: usize,
}

impl DryRunClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of times `set_region` was called.
    pub fn set_region_calls(&self) -> usize {
        self.set_region_calls
    }
}

impl RegionalClient for DryRunClient {
    fn set_region(&mut self, region: Region) {
        self.region = Some(region);
        self.set_region_calls += 1;
    }

    fn region(&self) -> Option<Region> {
        self.region
    }
}

struct ClientSlot<C> {
    client: C,
    /// Set after the first bind attempt, whether or not it applied a region.
    bound: bool,
}

/// Owns a provider client and the lock that serializes region binding.
///
/// The lock is per handle: binding one client never waits on another.
pub struct ClientHandle<C> {
    slot: Mutex<ClientSlot<C>>,
}

impl<C> ClientHandle<C> {
    pub fn new(client: C) -> Self {
        Self {
            slot: Mutex::new(ClientSlot {
                client,
                bound: false,
            }),
        }
    }

    /// Run `f` with exclusive access to the client.
    pub fn with_client<R>(&self, f: impl FnOnce(&mut C) -> R) -> R {
        f(&mut self.lock().client)
    }

    /// Returns true once a bind has been attempted on this handle.
    pub fn is_bound(&self) -> bool {
        self.lock().bound
    }

    pub fn into_inner(self) -> C {
        self.slot
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
            .client
    }

    fn lock(&self) -> MutexGuard<'_, ClientSlot<C>> {
        // The slot holds no invariant a panicking caller could break.
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<C: RegionalClient> ClientHandle<C> {
    /// Region the client currently uses.
    pub fn region(&self) -> Option<Region> {
        self.lock().client.region()
    }
}

// Never blocks: formatting may happen while the caller holds the slot.
impl<C> std::fmt::Debug for ClientHandle<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut debug = f.debug_struct("ClientHandle");
        match self.slot.try_lock() {
            Ok(slot) => debug.field("bound", &slot.bound),
            Err(TryLockError::Poisoned(poisoned)) => {
                debug.field("bound", &poisoned.into_inner().bound)
            }
            Err(TryLockError::WouldBlock) => debug.field("bound", &format_args!("<locked>")),
        };
        debug.finish_non_exhaustive()
    }
}

/// Result of a [`RegionBinder::bind`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindOutcome {
    /// No region configured; the client keeps the provider default.
    NoRegion,

    /// The client now uses this region.
    Bound(Region),

    /// The handle was bound by an earlier call.
    AlreadyBound,

    /// The name is not a recognized region; the client keeps its default.
    InvalidRegion(String),
}

/// Applies configured regions to provider clients.
#[derive(Debug, Clone, Copy, Default)]
pub struct RegionBinder;

impl RegionBinder {
    pub fn new() -> Self {
        Self
    }

    /// Apply `region_name` to the client behind `handle`.
    ///
    /// Never fails: an absent region is a no-op, an unknown one is logged as
    /// a warning. Only the first attempt on a handle has any effect.
    pub fn bind<C: RegionalClient>(
        &self,
        handle: &ClientHandle<C>,
        region_name: Option<&str>,
    ) -> BindOutcome {
        let Some(name) = region_name else {
            debug!("No region configured, keeping provider default");
            return BindOutcome::NoRegion;
        };

        let mut slot = handle.lock();
        if slot.bound {
            debug!(region = name, "Client already bound");
            return BindOutcome::AlreadyBound;
        }
        slot.bound = true;

        match Region::from_name(name) {
            Ok(region) => {
                slot.client.set_region(region);
                info!(region = %region, "Bound provider client to region");
                BindOutcome::Bound(region)
            }
            Err(e) => {
                warn!(region = name, error = %e, "Invalid region, keeping provider default");
                BindOutcome::InvalidRegion(name.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    #[test]
    fn test_region_names_round_trip() {
        for region in Region::ALL {
            assert_eq!(Region::from_name(region.name()), Ok(*region));
            assert_eq!(region.to_string().parse::<Region>(), Ok(*region));
        }
    }

    #[test]
    fn test_unknown_region() {
        assert_eq!(
            Region::from_name("westeros-east-1"),
            Err(RegionError::UnknownRegion("westeros-east-1".to_string()))
        );
        assert!(Region::from_name("").is_err());
        assert!(Region::from_name("US-WEST-2").is_err());
    }

    #[test]
    fn test_bind_sets_region() {
        let handle = ClientHandle::new(DryRunClient::new());
        let outcome = RegionBinder::new().bind(&handle, Some("us-west-2"));

        assert_eq!(outcome, BindOutcome::Bound(Region::UsWest2));
        assert_eq!(handle.region(), Some(Region::UsWest2));
        assert!(handle.is_bound());
    }

    #[test]
    fn test_bind_without_region_is_noop() {
        let handle = ClientHandle::new(DryRunClient::new());
        let outcome = RegionBinder::new().bind(&handle, None);

        assert_eq!(outcome, BindOutcome::NoRegion);
        assert!(!handle.is_bound());
        assert_eq!(handle.into_inner().set_region_calls(), 0);
    }

    #[test]
    fn test_invalid_region_keeps_default() {
        let handle = ClientHandle::new(DryRunClient::new());
        let outcome = RegionBinder::new().bind(&handle, Some("westeros-east-1"));

        assert_eq!(
            outcome,
            BindOutcome::InvalidRegion("westeros-east-1".to_string())
        );
        assert_eq!(handle.region(), None);
        assert_eq!(handle.with_client(|c| c.set_region_calls()), 0);
    }

    #[test]
    fn test_bind_applies_once() {
        let binder = RegionBinder::new();
        let handle = ClientHandle::new(DryRunClient::new());

        assert_eq!(
            binder.bind(&handle, Some("eu-west-1")),
            BindOutcome::Bound(Region::EuWest1)
        );
        assert_eq!(
            binder.bind(&handle, Some("us-east-1")),
            BindOutcome::AlreadyBound
        );
        assert_eq!(handle.region(), Some(Region::EuWest1));
        assert_eq!(handle.into_inner().set_region_calls(), 1);
    }

    #[test]
    fn test_debug_does_not_block_while_client_in_use() {
        let handle = ClientHandle::new(DryRunClient::new());
        assert_eq!(format!("{handle:?}"), "ClientHandle { bound: false, .. }");

        let inside = handle.with_client(|_| format!("{handle:?}"));
        assert_eq!(inside, "ClientHandle { bound: <locked>, .. }");

        RegionBinder::new().bind(&handle, Some("us-west-1"));
        assert_eq!(format!("{handle:?}"), "ClientHandle { bound: true, .. }");
    }

    #[test]
    fn test_concurrent_binds() {
        let binder = RegionBinder::new();
        let shared = Arc::new(ClientHandle::new(DryRunClient::new()));
        let distinct: Vec<_> = (0..8)
            .map(|_| ClientHandle::new(DryRunClient::new()))
            .collect();

        std::thread::scope(|scope| {
            for handle in &distinct {
                scope.spawn(move || binder.bind(handle, Some("ap-south-1")));
            }
            for _ in 0..8 {
                let shared = Arc::clone(&shared);
                scope.spawn(move || binder.bind(&shared, Some("us-east-2")));
            }
        });

        for handle in distinct {
            assert_eq!(handle.region(), Some(Region::ApSouth1));
        }
        assert_eq!(shared.region(), Some(Region::UsEast2));
        assert_eq!(shared.with_client(|c| c.set_region_calls()), 1);
    }
}
