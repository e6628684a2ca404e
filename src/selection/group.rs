//! Output grouping and eligibility filtering
//!
//! Spending several outputs paid to the same script in separate transactions
//! links them anyway, so the selector treats such outputs as a unit: an
//! [`OutputGroup`]. Groups aggregate the values, fees, weights and ancestry
//! of their members and are the element the solvers actually pick.
//!
//! Before any solver runs, groups pass through an [`EligibilityFilter`].
//! Filters form a lattice ordered from strict to loose; a caller that cannot
//! fund a transaction under the strict filter retries under progressively
//! looser ones. [`group_candidates`] builds the whole filter-keyed catalog in
//! one pass over the pool.

use crate::selection::params::SelectionParams;
use crate::selection::types::{Candidate, CandidatePool};
use bitcoin::{Script, ScriptBuf};
use std::collections::BTreeMap;

/// Depth sentinel a fresh group starts at; lowered by every insert.
const DEPTH_SENTINEL: i32 = 999;

/// Script shape of an output, used to bucket groups by type.
///
/// Selecting inputs of a single type keeps the spending transaction from
/// advertising everything the wallet holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OutputKind {
    /// Pay-to-pubkey-hash
    Legacy,
    /// Pay-to-script-hash (including wrapped segwit)
    NestedSegwit,
    /// Native segwit v0 (P2WPKH or P2WSH)
    Segwit,
    /// Taproot (P2TR)
    Taproot,
    /// Anything else
    Unknown,
}

impl OutputKind {
    /// Classify a locking script
    pub fn from_script(script: &Script) -> Self {
        if script.is_p2pkh() {
            OutputKind::Legacy
        } else if script.is_p2sh() {
            OutputKind::NestedSegwit
        } else if script.is_v0_p2wpkh() || script.is_v0_p2wsh() {
            OutputKind::Segwit
        } else if script.is_v1_p2tr() {
            OutputKind::Taproot
        } else {
            OutputKind::Unknown
        }
    }
}

/// Criteria an [`OutputGroup`] must meet to participate in a selection pass.
///
/// Filters order lexicographically over
/// (conf_mine, conf_theirs, max_ancestors, max_descendants,
/// include_partial_groups), so a sorted collection iterates from strictest
/// to loosest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct EligibilityFilter {
    /// Minimum confirmations for outputs we sent to ourselves
    pub conf_mine: i32,
    /// Minimum confirmations for outputs received from other wallets
    pub conf_theirs: i32,
    /// Maximum aggregate unconfirmed ancestors across the group
    pub max_ancestors: u64,
    /// Maximum descendants of any single member
    pub max_descendants: u64,
    /// Whether partial sibling groups may be used
    pub include_partial_groups: bool,
}

impl EligibilityFilter {
    /// Filter with the descendant limit equal to the ancestor limit
    pub fn new(conf_mine: i32, conf_theirs: i32, max_ancestors: u64) -> Self {
        Self::with_descendants(conf_mine, conf_theirs, max_ancestors, max_ancestors)
    }

    /// Filter with separate ancestor and descendant limits
    pub fn with_descendants(
        conf_mine: i32,
        conf_theirs: i32,
        max_ancestors: u64,
        max_descendants: u64,
    ) -> Self {
        Self {
            conf_mine,
            conf_theirs,
            max_ancestors,
            max_descendants,
            include_partial_groups: false,
        }
    }

    /// Admit partial sibling groups under this filter
    pub fn including_partial_groups(mut self) -> Self {
        self.include_partial_groups = true;
        self
    }
}

/// A group of candidates paid to the same script, selected as a unit.
#[derive(Debug, Clone)]
pub struct OutputGroup {
    indices: Vec<usize>,
    /// Whether every member was sent by this wallet to itself
    pub from_me: bool,
    /// Summed gross value of the members, in satoshis
    pub value: u64,
    /// Minimum chain depth across the members
    pub depth: i32,
    /// Summed unconfirmed ancestor count (not deduplicated)
    pub ancestors: u64,
    /// Maximum descendant count of any single member
    pub descendants: u64,
    /// Summed effective value of the members, in satoshis
    pub effective_value: i64,
    /// Summed fee to spend the members at the effective feerate, in satoshis
    pub fee: u64,
    /// Summed fee to spend the members at the long-term feerate, in satoshis
    pub long_term_fee: u64,
    /// Whether fees are being subtracted from the recipient outputs
    pub subtract_fee_outputs: bool,
    /// Summed input size of the members, in virtual bytes
    pub weight: u64,
}

impl OutputGroup {
    /// Create an empty group configured from the selection parameters
    pub fn new(params: &SelectionParams) -> Self {
        Self {
            indices: Vec::new(),
            from_me: true,
            value: 0,
            depth: DEPTH_SENTINEL,
            ancestors: 0,
            descendants: 0,
            effective_value: 0,
            fee: 0,
            long_term_fee: 0,
            subtract_fee_outputs: params.subtract_fee_outputs,
            weight: 0,
        }
    }

    /// Add a candidate to this group, folding it into every aggregate.
    ///
    /// # Arguments
    /// * `index` - The candidate's index in the pool
    /// * `candidate` - The candidate itself
    pub fn insert(&mut self, index: usize, candidate: &Candidate) {
        self.indices.push(index);
        self.from_me &= candidate.from_me;
        self.value = self.value.saturating_add(candidate.value.to_sat());
        self.depth = self.depth.min(candidate.depth);
        self.ancestors = self.ancestors.saturating_add(candidate.ancestors);
        self.descendants = self.descendants.max(candidate.descendants);
        self.effective_value = self
            .effective_value
            .saturating_add(candidate.effective_value().to_sat());
        self.fee = self.fee.saturating_add(candidate.fee().to_sat());
        self.long_term_fee = self
            .long_term_fee
            .saturating_add(candidate.long_term_fee().to_sat());
        self.weight = self.weight.saturating_add(candidate.spend_vsize());
    }

    /// Whether this group passes the given eligibility filter
    pub fn eligible_for_spending(&self, filter: &EligibilityFilter) -> bool {
        let depth_ok = if self.from_me {
            self.depth >= filter.conf_mine
        } else {
            self.depth >= filter.conf_theirs
        };
        depth_ok && self.ancestors <= filter.max_ancestors && self.descendants <= filter.max_descendants
    }

    /// The value a solver sees for this group, in satoshis.
    ///
    /// Gross value when fees are subtracted from the outputs, effective
    /// value otherwise. A single selection call uses one notion throughout.
    pub fn selection_amount(&self) -> i64 {
        if self.subtract_fee_outputs {
            self.value as i64
        } else {
            self.effective_value
        }
    }

    /// Spend-now versus spend-later fee difference, in satoshis
    pub fn fee_excess(&self) -> i64 {
        (self.fee as i64).saturating_sub(self.long_term_fee as i64)
    }

    /// Pool indices of the members
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// Number of members in this group
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// Check if this group has no members
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// Sign-partitioned groups for one bucket.
#[derive(Debug, Clone, Default)]
pub struct Groups {
    /// Groups whose selection amount is strictly positive
    pub positive: Vec<OutputGroup>,
    /// All groups, including non-positive ones
    pub mixed: Vec<OutputGroup>,
}

impl Groups {
    fn push(&mut self, group: &OutputGroup, insert_positive: bool, insert_mixed: bool) {
        if insert_positive && group.selection_amount() > 0 {
            self.positive.push(group.clone());
        }
        if insert_mixed {
            self.mixed.push(group.clone());
        }
    }

    /// Check if this bucket holds no groups at all
    pub fn is_empty(&self) -> bool {
        self.positive.is_empty() && self.mixed.is_empty()
    }
}

/// Groups partitioned by output kind, plus the union across kinds.
#[derive(Debug, Clone, Default)]
pub struct GroupCatalog {
    /// Groups bucketed by the script kind of their members
    pub by_kind: BTreeMap<OutputKind, Groups>,
    /// All inserted groups, no kind distinction
    pub all: Groups,
}

impl GroupCatalog {
    /// Append a group to the buckets selected by the insertion flags.
    ///
    /// The positive partition additionally requires the group's selection
    /// amount to be positive.
    pub fn push(
        &mut self,
        group: &OutputGroup,
        kind: OutputKind,
        insert_positive: bool,
        insert_mixed: bool,
    ) {
        self.by_kind
            .entry(kind)
            .or_default()
            .push(group, insert_positive, insert_mixed);
        self.all.push(group, insert_positive, insert_mixed);
    }

    /// Number of distinct output kinds present
    pub fn kinds_count(&self) -> usize {
        self.by_kind.len()
    }
}

/// Catalog of eligible groups, keyed by the filter that admitted them.
pub type FilteredGroups = BTreeMap<EligibilityFilter, GroupCatalog>;

/// Build the filter-keyed group catalog for a pool.
///
/// Without avoid-partial-spends every candidate forms its own group. With
/// it, candidates sharing a script form groups of at most `max_entries`
/// members; overflow spills into sibling groups, and the trailing partial
/// sibling is only admitted by filters that include partial groups. Dust
/// (non-positive effective value) never joins a script group.
///
/// Unspendable candidates are skipped; unsafe ones are skipped unless the
/// parameters allow them.
pub fn group_candidates(
    pool: &CandidatePool,
    params: &SelectionParams,
    filters: &[EligibilityFilter],
    max_entries: usize,
) -> FilteredGroups {
    let mut catalogs = FilteredGroups::new();
    for filter in filters {
        catalogs.entry(*filter).or_default();
    }

    if !params.avoid_partial_spends {
        for (index, candidate) in pool.all().iter().enumerate() {
            if !usable(candidate, params) {
                continue;
            }
            let mut group = OutputGroup::new(params);
            group.insert(index, candidate);
            let kind = OutputKind::from_script(&candidate.script_pubkey);
            for filter in filters {
                if group.eligible_for_spending(filter) {
                    if let Some(catalog) = catalogs.get_mut(filter) {
                        catalog.push(&group, kind, true, true);
                    }
                }
            }
        }
        return catalogs;
    }

    // One run of sibling groups per script, spilling at max_entries.
    let mut by_script: BTreeMap<ScriptBuf, Vec<OutputGroup>> = BTreeMap::new();
    for (index, candidate) in pool.all().iter().enumerate() {
        if !usable(candidate, params) {
            continue;
        }
        if candidate.is_dust() {
            continue;
        }
        let siblings = by_script
            .entry(candidate.script_pubkey.clone())
            .or_default();
        let needs_new = match siblings.last() {
            Some(last) => max_entries > 0 && last.len() >= max_entries,
            None => true,
        };
        if needs_new {
            siblings.push(OutputGroup::new(params));
        }
        if let Some(last) = siblings.last_mut() {
            last.insert(index, candidate);
        }
    }

    for (script, siblings) in &by_script {
        let kind = OutputKind::from_script(script);
        let spilled = siblings.len() > 1;
        for group in siblings {
            let partial = spilled && (max_entries == 0 || group.len() < max_entries);
            for filter in filters {
                if !group.eligible_for_spending(filter) {
                    continue;
                }
                if partial && !filter.include_partial_groups {
                    continue;
                }
                if let Some(catalog) = catalogs.get_mut(filter) {
                    catalog.push(group, kind, true, true);
                }
            }
        }
    }

    catalogs
}

fn usable(candidate: &Candidate, params: &SelectionParams) -> bool {
    candidate.spendable && (candidate.safe || params.include_unsafe_inputs)
}
