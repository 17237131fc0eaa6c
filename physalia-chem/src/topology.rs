//! Deferred stereo configurations and their post-parse resolution.
//!
//! The parser records symbolic configurations (`@`, `@@`, `@TH1`, ...) while
//! scanning and resolves them here once the whole string has been read:
//! ring closures and branches can reorder neighbors, so the final neighbor
//! order is not known mid-scan.

use std::collections::{BTreeMap, BTreeSet};

use crate::buffer::CharBuffer;
use crate::graph::{Bond, Graph};
use crate::parser::InvalidSmiles;

/// Symbolic stereo configuration read from a bracket atom.
///
/// `AntiClockwise` (`@`) and `Clockwise` (`@@`) are implicit: their concrete
/// geometry depends on the focus atom's environment and is resolved after
/// parsing. The numbered forms are explicit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Configuration {
    Unknown,
    /// `@`
    AntiClockwise,
    /// `@@`
    Clockwise,
    /// `@TH1`: tetrahedral, neighbors anticlockwise.
    Th1,
    /// `@TH2`: tetrahedral, neighbors clockwise.
    Th2,
    /// `@DB1`: double-bond configuration, anticlockwise.
    Db1,
    /// `@DB2`: double-bond configuration, clockwise.
    Db2,
    /// `@AL1`: extended tetrahedral (allenal), anticlockwise.
    Al1,
    /// `@AL2`: extended tetrahedral (allenal), clockwise.
    Al2,
}

/// The geometric class of a configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigurationKind {
    None,
    Implicit,
    Tetrahedral,
    DoubleBond,
    ExtendedTetrahedral,
}

impl Configuration {
    pub fn kind(self) -> ConfigurationKind {
        match self {
            Configuration::Unknown => ConfigurationKind::None,
            Configuration::AntiClockwise | Configuration::Clockwise => ConfigurationKind::Implicit,
            Configuration::Th1 | Configuration::Th2 => ConfigurationKind::Tetrahedral,
            Configuration::Db1 | Configuration::Db2 => ConfigurationKind::DoubleBond,
            Configuration::Al1 | Configuration::Al2 => ConfigurationKind::ExtendedTetrahedral,
        }
    }

    /// Read an optional chiral specification from a bracket atom. Returns
    /// `Unknown` when no `@` is present.
    pub(crate) fn read(buffer: &mut CharBuffer) -> Result<Configuration, InvalidSmiles> {
        if !buffer.get_if(b'@') {
            return Ok(Configuration::Unknown);
        }
        if buffer.get_if(b'@') {
            return Ok(Configuration::Clockwise);
        }
        match buffer.peek() {
            Some(b'T') => {
                buffer.get();
                if buffer.get_if(b'H') {
                    read_parity(buffer, Configuration::Th1, Configuration::Th2)
                } else {
                    Err(invalid_chiral(buffer))
                }
            }
            Some(b'A') => {
                buffer.get();
                if buffer.get_if(b'L') {
                    read_parity(buffer, Configuration::Al1, Configuration::Al2)
                } else {
                    Err(invalid_chiral(buffer))
                }
            }
            Some(b'D') => {
                buffer.get();
                if buffer.get_if(b'B') {
                    read_parity(buffer, Configuration::Db1, Configuration::Db2)
                } else {
                    Err(invalid_chiral(buffer))
                }
            }
            // square-planar / trigonal-bipyramidal / octahedral specs
            Some(b'S') | Some(b'O') => Err(invalid_chiral(buffer)),
            _ => Ok(Configuration::AntiClockwise),
        }
    }
}

fn read_parity(
    buffer: &mut CharBuffer,
    one: Configuration,
    two: Configuration,
) -> Result<Configuration, InvalidSmiles> {
    match buffer.get() {
        Some(b'1') => Ok(one),
        Some(b'2') => Ok(two),
        _ => Err(invalid_chiral(buffer)),
    }
}

fn invalid_chiral(buffer: &CharBuffer) -> InvalidSmiles {
    InvalidSmiles::new("invalid chiral specification", buffer.position())
}

/// A resolved, neighbor-ordered stereo description anchored at a vertex.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topology {
    /// The stereocentre.
    pub focus: usize,
    /// Reference atoms in the order that gives the configuration meaning.
    /// For tetrahedral centres with an implicit hydrogen the focus itself
    /// stands in as the synthetic reference.
    pub carriers: Vec<usize>,
    pub configuration: Configuration,
}

/// Neighbor-visit order around a vertex, tracked only once a ring bond opens
/// there. Ring closures are recorded as placeholders and patched once the
/// partner vertex is known, so the arrangement preserves written order even
/// though the closing edge is appended to the graph much later.
#[derive(Debug, Clone, Default)]
pub(crate) struct LocalArrangement {
    entries: Vec<Neighbor>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Neighbor {
    Vertex(usize),
    Ring(u32),
}

impl LocalArrangement {
    pub fn add_vertex(&mut self, v: usize) {
        self.entries.push(Neighbor::Vertex(v));
    }

    pub fn add_ring(&mut self, rnum: u32) {
        self.entries.push(Neighbor::Ring(rnum));
    }

    /// Patch the first open placeholder for `rnum` with the closing vertex.
    pub fn close_ring(&mut self, rnum: u32, v: usize) {
        for entry in &mut self.entries {
            if *entry == Neighbor::Ring(rnum) {
                *entry = Neighbor::Vertex(v);
                return;
            }
        }
    }

    /// The recorded neighbors in written order. Placeholders for rings that
    /// never closed are skipped; the parser rejects such input before
    /// resolution runs.
    pub fn vertices(&self) -> Vec<usize> {
        self.entries
            .iter()
            .filter_map(|n| match n {
                Neighbor::Vertex(v) => Some(*v),
                Neighbor::Ring(_) => None,
            })
            .collect()
    }
}

/// Resolve all deferred configurations into topologies on the graph, then
/// check directional-bond consistency. `pos` positions any error raised by
/// this post-pass.
pub(crate) fn create_topologies(
    g: &mut Graph,
    configurations: &BTreeMap<usize, Configuration>,
    arrangement: &BTreeMap<usize, LocalArrangement>,
    start: &BTreeSet<usize>,
    check_directional: &mut [bool],
    pos: usize,
) -> Result<(), InvalidSmiles> {
    for (&u, &c) in configurations {
        let explicit = to_explicit(g, u, c);
        if explicit.kind() == ConfigurationKind::None {
            continue;
        }
        if let Some(carriers) = resolve_carriers(g, u, explicit, arrangement, start, pos)? {
            g.add_topology(Topology {
                focus: u,
                carriers,
                configuration: explicit,
            });
        }
    }
    verify_directional_bonds(g, check_directional, pos)
}

/// Map an implicit `@`/`@@` onto its concrete class from the focus atom's
/// environment. Explicit configurations pass through unchanged.
pub(crate) fn to_explicit(g: &Graph, u: usize, c: Configuration) -> Configuration {
    if c.kind() != ConfigurationKind::Implicit {
        return c;
    }
    let anti = c == Configuration::AntiClockwise;
    let degree = g.degree(u);
    let doubles = g.edges_of(u).filter(|e| e.bond == Bond::Double).count();
    match degree {
        2 if doubles == 2 => {
            if anti {
                Configuration::Al1
            } else {
                Configuration::Al2
            }
        }
        3 if doubles > 0 => {
            if anti {
                Configuration::Db1
            } else {
                Configuration::Db2
            }
        }
        3 | 4 => {
            if anti {
                Configuration::Th1
            } else {
                Configuration::Th2
            }
        }
        _ => Configuration::Unknown,
    }
}

fn resolve_carriers(
    g: &Graph,
    u: usize,
    c: Configuration,
    arrangement: &BTreeMap<usize, LocalArrangement>,
    start: &BTreeSet<usize>,
    pos: usize,
) -> Result<Option<Vec<usize>>, InvalidSmiles> {
    if let Some(la) = arrangement.get(&u) {
        // ring closure at the focus: written order, not edge order
        let vs = la.vertices();
        for &v in &vs {
            if g.edge_between(u, v).is_none() {
                return Ok(None);
            }
        }
        let vs = match c.kind() {
            ConfigurationKind::Tetrahedral => insert_th_implicit_ref(u, vs, start, pos)?,
            ConfigurationKind::DoubleBond => insert_db_implicit_ref(u, vs, start, pos)?,
            _ => vs,
        };
        return Ok(Some(vs));
    }

    let vs: Vec<usize> = g.neighbors(u).collect();
    match c.kind() {
        ConfigurationKind::Tetrahedral => Ok(Some(insert_th_implicit_ref(u, vs, start, pos)?)),
        ConfigurationKind::DoubleBond => Ok(Some(insert_db_implicit_ref(u, vs, start, pos)?)),
        ConfigurationKind::ExtendedTetrahedral => Ok(extended_carriers(g, u)),
        _ => Ok(None),
    }
}

/// Gather the four peripheral references of an allenal centre: one
/// single-bonded substituent from each terminal, the terminals themselves
/// standing in where a substituent is implicit. Returns `None` when either
/// terminal lacks a resolvable substituent.
fn extended_carriers(g: &Graph, u: usize) -> Option<Vec<usize>> {
    let ends: Vec<usize> = g.neighbors(u).collect();
    if ends.len() != 2 {
        return None;
    }
    let (v, w) = (ends[0], ends[1]);

    let mut refs: [Option<usize>; 4] = [None, Some(v), None, Some(w)];
    let mut i = 0;
    for e in g.edges_of(v) {
        if is_single(e.bond) && i < 2 {
            refs[i] = Some(e.other(v));
            i += 1;
        }
    }
    let mut i = 2;
    for e in g.edges_of(w) {
        if is_single(e.bond) && i < 4 {
            refs[i] = Some(e.other(w));
            i += 1;
        }
    }

    if refs[0].is_none() || refs[2].is_none() {
        return None;
    }
    let mut vs: Vec<usize> = refs.into_iter().flatten().collect();
    vs.sort_unstable();
    Some(vs)
}

fn is_single(b: Bond) -> bool {
    matches!(b, Bond::Single | Bond::Implicit | Bond::Up | Bond::Down)
}

/// A tetrahedral centre written with 3 neighbors carries an implicit
/// hydrogen as the 4th reference: at the front when the focus started a new
/// run, otherwise straight after the preceding atom.
fn insert_th_implicit_ref(
    u: usize,
    vs: Vec<usize>,
    start: &BTreeSet<usize>,
    pos: usize,
) -> Result<Vec<usize>, InvalidSmiles> {
    match vs.len() {
        4 => Ok(vs),
        3 => {
            if start.contains(&u) {
                Ok(vec![u, vs[0], vs[1], vs[2]])
            } else {
                Ok(vec![vs[0], u, vs[1], vs[2]])
            }
        }
        _ => Err(InvalidSmiles::new(
            "invalid number of vertices for tetrahedral configuration",
            pos,
        )),
    }
}

fn insert_db_implicit_ref(
    u: usize,
    vs: Vec<usize>,
    start: &BTreeSet<usize>,
    pos: usize,
) -> Result<Vec<usize>, InvalidSmiles> {
    match vs.len() {
        3 => Ok(vs),
        2 => {
            if start.contains(&u) {
                Ok(vec![u, vs[0], vs[1]])
            } else {
                Ok(vec![vs[0], u, vs[1]])
            }
        }
        _ => Err(InvalidSmiles::new(
            "invalid number of vertices for double-bond configuration",
            pos,
        )),
    }
}

/// For every vertex flagged during parsing, count the up/down bonds on each
/// side of its double bond; more than one up or down on either side is an
/// error. Sides with no directional bonds at all are left alone.
pub(crate) fn verify_directional_bonds(
    g: &Graph,
    flagged: &mut [bool],
    pos: usize,
) -> Result<(), InvalidSmiles> {
    for v in 0..flagged.len() {
        if !flagged[v] {
            continue;
        }

        let mut n_up_v = 0;
        let mut n_down_v = 0;
        let mut w = None;
        for e in g.edges_of(v) {
            match e.bond_for(v) {
                Bond::Up => n_up_v += 1,
                Bond::Down => n_down_v += 1,
                Bond::Double => w = Some(e.other(v)),
                _ => {}
            }
        }
        let Some(w) = w else { continue };
        if w < flagged.len() {
            flagged[w] = false;
        }

        let mut n_up_w = 0;
        let mut n_down_w = 0;
        for e in g.edges_of(w) {
            match e.bond_for(w) {
                Bond::Up => n_up_w += 1,
                Bond::Down => n_down_w += 1,
                _ => {}
            }
        }

        if n_up_v + n_down_v == 0 || n_up_w + n_down_w == 0 {
            continue;
        }
        if n_up_v > 1 || n_down_v > 1 {
            return Err(InvalidSmiles::new(
                format!("multiple directional bonds on atom {v}"),
                pos,
            ));
        }
        if n_up_w > 1 || n_down_w > 1 {
            return Err(InvalidSmiles::new(
                format!("multiple directional bonds on atom {w}"),
                pos,
            ));
        }
    }
    Ok(())
}
