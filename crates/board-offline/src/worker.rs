//! Install-time pre-cache fill and fetch interception
//!
//! The two handlers of the offline cache filter. `on_install` fills the cache
//! namespace from the pre-cache manifest as one all-or-nothing operation;
//! `on_fetch` decides, per request, which source answers. Navigations are
//! cache-averse (network preferred, cache only as a last resort), everything
//! else is cache-eager (cache preferred). Reversing that would either serve
//! stale pages or defeat offline support for static assets.

use crate::config::WorkerConfig;
use crate::error::{OfflineError, Result};
use crate::fetch::NetworkFetch;
use crate::types::{Activation, InstallReport, Request, Response, ServedFrom};
use response_cache::{CachedResponse, RequestKey, ResponseStore};
use tracing::{debug, info, warn};

/// The offline cache filter.
///
/// Handlers take `&self`; concurrent `on_fetch` invocations share only the
/// store, whose interior synchronization is the one piece of shared state.
/// Entries are written once, during the install phase, which the host
/// guarantees does not overlap fetch interception of the same instance.
pub struct OfflineWorker<S, N> {
    config: WorkerConfig,
    store: S,
    net: N,
}

impl<S: ResponseStore, N: NetworkFetch> OfflineWorker<S, N> {
    pub fn new(config: WorkerConfig, store: S, net: N) -> Self {
        Self { config, store, net }
    }

    pub fn config(&self) -> &WorkerConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// How the host should roll this filter over: always immediately,
    /// independent of the fill outcome.
    pub fn activation(&self) -> Activation {
        Activation::Immediate
    }

    /// Install phase: fetch every manifest entry in order, then commit all
    /// snapshots in one bulk write. Any failing entry aborts the whole fill
    /// with nothing committed; the host retries the entire install later.
    pub async fn on_install(&self) -> Result<InstallReport> {
        let manifest = &self.config.precache_manifest;
        let mut staged: Vec<(RequestKey, CachedResponse)> = Vec::with_capacity(manifest.len());

        for path in manifest {
            let request = Request::get(path.clone());
            let response =
                self.net
                    .fetch(&request)
                    .await
                    .map_err(|e| OfflineError::Precache {
                        path: path.clone(),
                        reason: e.to_string(),
                    })?;
            if !response.is_success() {
                return Err(OfflineError::Precache {
                    path: path.clone(),
                    reason: format!("unexpected status {}", response.status),
                });
            }
            staged.push((request.key(), response.into_snapshot()));
        }

        self.store.put_all(staged).await?;

        info!(
            cache_name = %self.config.cache_name,
            precached = manifest.len(),
            "Pre-cache fill complete"
        );
        Ok(InstallReport {
            cache_name: self.config.cache_name.clone(),
            precached: manifest.len(),
        })
    }

    /// Fetch interception: network-first for navigations, cache-first for
    /// everything else. Nothing is ever written to the cache here; the
    /// install-time fill is the only writer.
    pub async fn on_fetch(&self, request: &Request) -> Result<(Response, ServedFrom)> {
        if request.mode.is_navigation() {
            self.fetch_navigation(request).await
        } else {
            self.fetch_resource(request).await
        }
    }

    async fn fetch_navigation(&self, request: &Request) -> Result<(Response, ServedFrom)> {
        match self.net.fetch(request).await {
            Ok(response) => Ok((response, ServedFrom::Network)),
            Err(net_err) => {
                debug!(url = %request.url, error = %net_err, "Navigation fetch failed, trying cache");
                match self.lookup(request).await {
                    Some(snapshot) => Ok((snapshot.into(), ServedFrom::Cache)),
                    None => Err(OfflineError::Offline {
                        url: request.url.clone(),
                    }),
                }
            }
        }
    }

    async fn fetch_resource(&self, request: &Request) -> Result<(Response, ServedFrom)> {
        if let Some(snapshot) = self.lookup(request).await {
            return Ok((snapshot.into(), ServedFrom::Cache));
        }
        let response = self.net.fetch(request).await?;
        Ok((response, ServedFrom::Network))
    }

    /// Cache lookup with read errors absorbed as misses.
    async fn lookup(&self, request: &Request) -> Option<CachedResponse> {
        match self.store.get(&request.key()).await {
            Ok(hit) => hit,
            Err(e) => {
                warn!(url = %request.url, error = %e, "Cache lookup failed");
                None
            }
        }
    }
}
