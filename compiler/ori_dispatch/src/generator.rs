//! Dispatch table generation.
//!
//! Drives the whole pass over the class hierarchy:
//!
//! ```text
//! number_selectors ──► setup_selector_rows ──► compute_selector_offsets ──► build_table
//!  (SelectorMap flags)   (SelectorRow per id,     (RowFitter, biggest         (DispatchTable)
//!                         finalized footprints)     rows first)
//! ```
//!
//! Each step moves the generator one phase forward; steps run exactly once
//! and in order. [`generate`] runs all four and publishes the result.

use smallvec::SmallVec;

use crate::table::{DispatchTable, DispatchTableStats};
use crate::{
    verify, ClassHierarchy, ClassId, DispatchConfig, DispatchError, Interval, MemberProvider,
    RowFitter, SelectorId, SelectorMap, SelectorRow,
};

/// Generator progress. Moves strictly forward.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum GeneratorPhase {
    Uninitialized,
    SelectorsNumbered,
    RowsBuilt,
    OffsetsComputed,
    TableBuilt,
}

/// Everything the pass publishes to later compiler stages.
#[derive(Clone, Debug)]
pub struct GeneratedDispatch {
    pub selector_map: SelectorMap,
    pub table: DispatchTable,
    pub stats: DispatchTableStats,
}

/// Concrete-subclass ranges of one class. Usually a single range.
type SubclassRanges = SmallVec<[Interval; 1]>;

/// Builds the dispatch table for one compilation.
pub struct DispatchTableGenerator<'a> {
    hierarchy: &'a dyn ClassHierarchy,
    members: &'a dyn MemberProvider,
    phase: GeneratorPhase,
    selector_map: SelectorMap,
    /// Live rows only, once [`setup_selector_rows`](Self::setup_selector_rows) ran.
    rows: Vec<SelectorRow>,
    table_size: i32,
    table: DispatchTable,
}

impl<'a> DispatchTableGenerator<'a> {
    pub fn new(hierarchy: &'a dyn ClassHierarchy, members: &'a dyn MemberProvider) -> Self {
        Self {
            hierarchy,
            members,
            phase: GeneratorPhase::Uninitialized,
            selector_map: SelectorMap::new(),
            rows: Vec::new(),
            table_size: 0,
            table: DispatchTable::default(),
        }
    }

    pub fn phase(&self) -> GeneratorPhase {
        self.phase
    }

    pub fn selector_map(&self) -> &SelectorMap {
        &self.selector_map
    }

    /// Live rows, in placement order once offsets are computed.
    pub fn rows(&self) -> &[SelectorRow] {
        &self.rows
    }

    pub fn table(&self) -> &DispatchTable {
        &self.table
    }

    fn advance(&mut self, from: GeneratorPhase, to: GeneratorPhase) {
        assert_eq!(
            self.phase, from,
            "dispatch table generator: cannot enter {to:?} from {:?}",
            self.phase
        );
        self.phase = to;
    }

    /// Register every dispatchable member's selector and its call-site
    /// properties.
    ///
    /// Fails if a dispatchable member has no selector id; that means the
    /// whole-program analysis assigning ids did not run.
    pub fn number_selectors(&mut self) -> Result<(), DispatchError> {
        self.advance(GeneratorPhase::Uninitialized, GeneratorPhase::SelectorsNumbered);

        let (hierarchy, members) = (self.hierarchy, self.members);
        for cid in class_ids(hierarchy) {
            let on_null_interface = hierarchy.is_object_class(cid);
            for &member in members.members_of(cid) {
                if !members.is_dynamically_dispatchable(member) {
                    continue;
                }
                let Some(sid) = self.selector_map.selector_id(members, member) else {
                    return Err(DispatchError::MissingSelectorId { class: cid, member });
                };
                self.selector_map.register_properties(
                    sid,
                    on_null_interface,
                    members.requires_args_descriptor(member),
                );
            }
        }

        tracing::debug!(num_selectors = self.selector_map.num_ids(), "numbered selectors");
        Ok(())
    }

    /// Build one row per selector and keep those with overrides.
    pub fn setup_selector_rows(&mut self) {
        self.advance(GeneratorPhase::SelectorsNumbered, GeneratorPhase::RowsBuilt);

        let depths = self.compute_depths();
        let subclass_ranges = self.compute_subclass_ranges();

        let num_ids = u32::try_from(self.selector_map.num_ids())
            .unwrap_or_else(|_| panic!("selector count exceeds u32::MAX"));
        let mut rows: Vec<SelectorRow> = (0..num_ids)
            .map(|raw| SelectorRow::new(SelectorId::new(raw)))
            .collect();

        for cid in class_ids(self.hierarchy) {
            let ranges = &subclass_ranges[cid.index()];
            if ranges.is_empty() {
                continue;
            }
            for &member in self.members.members_of(cid) {
                if !self.members.is_dynamically_dispatchable(member) {
                    continue;
                }
                let Some(sid) = self.members.selector_id_of(member) else {
                    debug_assert!(false, "member {member} lost its selector id after numbering");
                    continue;
                };
                let row = &mut rows[sid.index()];
                for &range in ranges {
                    row.add_override(cid, depths[cid.index()], range, member);
                }
            }
        }

        rows.retain_mut(SelectorRow::finalize);
        self.rows = rows;

        tracing::debug!(
            live_rows = self.rows.len(),
            num_selectors = self.selector_map.num_ids(),
            "built selector rows"
        );
    }

    /// Place every live row, largest first, and record the offsets.
    pub fn compute_selector_offsets(&mut self) {
        self.advance(GeneratorPhase::RowsBuilt, GeneratorPhase::OffsetsComputed);

        // Stable, so equal-size rows keep selector order and layouts are
        // reproducible.
        self.rows.sort_by(|a, b| b.total_size().cmp(&a.total_size()));

        let mut fitter = RowFitter::new();
        for row in &mut self.rows {
            let offset = fitter.fit(row);
            row.set_offset(offset);
            self.selector_map.set_offset(row.selector(), offset);
        }
        self.table_size = fitter.table_size();

        tracing::debug!(table_size = self.table_size, "computed selector offsets");
    }

    /// Allocate the table and let every row write its entries.
    pub fn build_table(&mut self) {
        self.advance(GeneratorPhase::OffsetsComputed, GeneratorPhase::TableBuilt);

        let size = usize::try_from(self.table_size).unwrap_or_default();
        let mut table = DispatchTable::new(size);
        for row in &mut self.rows {
            row.fill_table(self.members, &mut table);
        }
        self.table = table;

        tracing::debug!(filled = self.table.filled(), size, "built dispatch table");
    }

    /// Publish the selector map and table. Only valid once the table is
    /// built.
    pub fn finish(self) -> GeneratedDispatch {
        assert_eq!(
            self.phase,
            GeneratorPhase::TableBuilt,
            "dispatch table published before it was built"
        );
        let stats = DispatchTableStats {
            num_selectors: self.selector_map.num_ids(),
            live_rows: self.rows.len(),
            table_size: self.table.len(),
            filled: self.table.filled(),
        };
        GeneratedDispatch {
            selector_map: self.selector_map,
            table: self.table,
            stats,
        }
    }

    /// Inheritance depth per class id: roots are 1, non-classes 0.
    ///
    /// Each class is resolved once: the walk up a superclass chain stops at
    /// the first ancestor whose depth is already known. A depth never
    /// exceeds the number of classes, so `u32` cannot overflow.
    fn compute_depths(&self) -> Vec<u32> {
        let mut depths = vec![0u32; self.hierarchy.num_cids() as usize];
        let mut chain = Vec::new();
        for cid in class_ids(self.hierarchy) {
            let mut current = Some(cid);
            let mut depth = 0;
            while let Some(class) = current {
                if depths[class.index()] != 0 {
                    depth = depths[class.index()];
                    break;
                }
                chain.push(class);
                current = self.hierarchy.parent_of(class);
            }
            for class in chain.drain(..).rev() {
                depth += 1;
                depths[class.index()] = depth;
            }
        }
        depths
    }

    /// For every class, the maximal runs of consecutive ids of its concrete
    /// subclasses (itself included).
    ///
    /// Visiting concrete classes in ascending id order and appending each to
    /// all of its ancestors keeps every list sorted, so a run only ever
    /// grows at its end.
    fn compute_subclass_ranges(&self) -> Vec<SubclassRanges> {
        let mut ranges = vec![SubclassRanges::new(); self.hierarchy.num_cids() as usize];
        for cid in class_ids(self.hierarchy) {
            if !self.hierarchy.is_concrete(cid) {
                continue;
            }
            let column = Interval::of_class(cid);
            let mut current = Some(cid);
            while let Some(class) = current {
                let list = &mut ranges[class.index()];
                match list.last_mut() {
                    Some(last) if last.end() == column.begin() => last.extend_to_include(column),
                    _ => list.push(column),
                }
                current = self.hierarchy.parent_of(class);
            }
        }
        ranges
    }
}

/// Class ids that name classes, in ascending order.
fn class_ids(hierarchy: &dyn ClassHierarchy) -> impl Iterator<Item = ClassId> + '_ {
    (1..hierarchy.num_cids())
        .map(ClassId::new)
        .filter(|&cid| hierarchy.has_class(cid))
}

/// Generate the dispatch table for a whole program.
///
/// Returns `Ok(None)` when table dispatch is disabled.
pub fn generate(
    hierarchy: &dyn ClassHierarchy,
    members: &dyn MemberProvider,
    config: &DispatchConfig,
) -> Result<Option<GeneratedDispatch>, DispatchError> {
    if !config.use_table_dispatch {
        tracing::debug!("table dispatch disabled, skipping dispatch table generation");
        return Ok(None);
    }

    let _span = tracing::debug_span!("dispatch_table", num_cids = hierarchy.num_cids()).entered();

    let mut generator = DispatchTableGenerator::new(hierarchy, members);
    generator.number_selectors()?;
    generator.setup_selector_rows();
    generator.compute_selector_offsets();
    generator.build_table();

    if config.verify_layout {
        verify::verify_layout(generator.rows(), generator.table(), members)?;
    }

    let generated = generator.finish();
    tracing::debug!(
        num_selectors = generated.stats.num_selectors,
        live_rows = generated.stats.live_rows,
        table_size = generated.stats.table_size,
        filled = generated.stats.filled,
        "dispatch table generated"
    );
    Ok(Some(generated))
}
