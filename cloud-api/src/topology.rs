//! Multi-household topology discovery.

use cloud_gateway::{classify, ApiRequest, GatewayError, HttpGateway};
use futures::future::try_join_all;
use tracing::debug;

use crate::error::{ApiError, Result};
use crate::types::{GroupsResponse, HouseholdsResponse, SpeakerGroup, Topology};

/// Path of the household listing endpoint.
const HOUSEHOLDS_PATH: &str = "/api/v2/sonos/households";

/// Discovers every household reachable with the supplied token and merges
/// their groups and players into display-ready option lists.
///
/// Both discovery-facing callers (one wanting only groups, one wanting only
/// players) consume this same merged computation; discovery never
/// special-cases the caller.
#[derive(Debug, Clone)]
pub struct ResourceAggregator<G> {
    gateway: G,
}

impl<G: HttpGateway> ResourceAggregator<G> {
    pub fn new(gateway: G) -> Self {
        Self { gateway }
    }

    /// Fetch all households, fan out to each concurrently, and merge.
    ///
    /// The merged lists follow household discovery order, then per-household
    /// listing order, regardless of response arrival order, so results are
    /// deterministic for a fixed remote state. One failing household aborts
    /// the whole discovery; there is no partial-result mode.
    pub async fn discover(&self, access_token: &str) -> Result<Topology> {
        if access_token.is_empty() {
            return Err(ApiError::NotAuthenticated);
        }

        let request = ApiRequest::get(HOUSEHOLDS_PATH).bearer(access_token);
        let response =
            classify::check(self.gateway.execute(request).await?).map_err(|err| match err {
                GatewayError::Api { status, message } => {
                    ApiError::HouseholdFetchFailed { status, message }
                }
                other => ApiError::Gateway(other),
            })?;
        if response.status != 200 {
            return Err(ApiError::HouseholdFetchFailed {
                status: response.status,
                message: response.raw_body,
            });
        }

        let listing: HouseholdsResponse = response
            .parsed_body
            .clone()
            .and_then(|body| serde_json::from_value(body).ok())
            .unwrap_or_default();
        if listing.households.is_empty() {
            return Err(ApiError::NoHouseholds);
        }

        let household_count = listing.households.len();
        debug!(households = household_count, "discovered households");

        let fetches = listing
            .households
            .iter()
            .enumerate()
            .map(|(index, household)| {
                self.fetch_household(access_token, &household.id, index, household_count)
            });
        let per_household = try_join_all(fetches).await?;

        let mut topology = Topology::default();
        for (groups, players) in per_household {
            topology.groups.extend(groups);
            topology.players.extend(players);
        }
        Ok(topology)
    }

    /// Fetch one household's groups and players and apply display naming.
    async fn fetch_household(
        &self,
        access_token: &str,
        household_id: &str,
        index: usize,
        household_count: usize,
    ) -> Result<(Vec<SpeakerGroup>, Vec<SpeakerGroup>)> {
        let path = format!("/api/v2/sonos/households/{household_id}/groups");
        let request = ApiRequest::get(path).bearer(access_token);
        let response =
            classify::check(self.gateway.execute(request).await?).map_err(|err| match err {
                GatewayError::Api { .. } => ApiError::GroupFetchFailed {
                    household_id: household_id.to_string(),
                },
                other => ApiError::Gateway(other),
            })?;
        if response.status != 200 {
            return Err(ApiError::GroupFetchFailed {
                household_id: household_id.to_string(),
            });
        }

        let listing: GroupsResponse = response
            .parsed_body
            .clone()
            .and_then(|body| serde_json::from_value(body).ok())
            .unwrap_or_default();

        let groups = listing
            .groups
            .into_iter()
            .map(|group| SpeakerGroup {
                name: display_name(group.name.as_deref(), &group.id, "Group", index, household_count),
                id: group.id,
            })
            .collect();
        let players = listing
            .players
            .into_iter()
            .map(|player| SpeakerGroup {
                name: display_name(
                    player.name.as_deref(),
                    &player.id,
                    "Player",
                    index,
                    household_count,
                ),
                id: player.id,
            })
            .collect();

        Ok((groups, players))
    }
}

/// Synthesize the display name for a group or player option.
///
/// Falls back to `"<kind> <last 8 chars of id>"` when the remote omits a
/// name, and appends `" (Household N)"` only when more than one household
/// exists. The suffix is applied identically to every group and player of a
/// household so identically-named targets in different households stay
/// visually distinguishable.
pub(crate) fn display_name(
    remote_name: Option<&str>,
    id: &str,
    kind: &str,
    household_index: usize,
    household_count: usize,
) -> String {
    let base = match remote_name {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => format!("{} {}", kind, tail(id, 8)),
    };
    if household_count > 1 {
        format!("{} (Household {})", base, household_index + 1)
    } else {
        base
    }
}

/// Char-boundary-safe slice of the trailing `n` characters of an id.
fn tail(id: &str, n: usize) -> &str {
    let start = id
        .char_indices()
        .rev()
        .nth(n - 1)
        .map(|(i, _)| i)
        .unwrap_or(0);
    &id[start..]
}
