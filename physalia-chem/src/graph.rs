//! Chemical graph produced by the SMILES parser.
//!
//! The graph is an append-only vertex/edge store: vertex indices are stable
//! from creation (0-based, insertion order) and edges are never removed.
//! Disconnections (`.` in SMILES) never materialize as edges.

use std::collections::BTreeMap;
use std::fmt;

use physalia_core::{Annotated, ContentAddressable, Summarizable};
use sha2::{Digest, Sha256};

use crate::element::Element;
use crate::topology::Topology;

/// Bond token between two atoms.
///
/// `Implicit` is the absence of a bond symbol and resolves to single or
/// aromatic in downstream molecule conversion; `Up`/`Down` are directional
/// single bonds whose sense is relative to the order the atoms were read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Bond {
    #[default]
    Implicit,
    /// Disconnection (`.`); a placeholder that is never added as an edge.
    Dot,
    Single,
    Double,
    Triple,
    Quadruple,
    Aromatic,
    /// Directional single bond (`/`).
    Up,
    /// Directional single bond (`\`).
    Down,
}

impl Bond {
    /// Formal bond order.
    pub fn order(self) -> u8 {
        match self {
            Bond::Dot => 0,
            Bond::Implicit | Bond::Single | Bond::Aromatic | Bond::Up | Bond::Down => 1,
            Bond::Double => 2,
            Bond::Triple => 3,
            Bond::Quadruple => 4,
        }
    }

    /// Whether this is a directional (`/` or `\`) bond.
    pub fn is_directional(self) -> bool {
        matches!(self, Bond::Up | Bond::Down)
    }

    /// The same bond viewed from the opposite endpoint. Only directional
    /// bonds change under inversion.
    pub fn inverse(self) -> Bond {
        match self {
            Bond::Up => Bond::Down,
            Bond::Down => Bond::Up,
            other => other,
        }
    }

    /// The SMILES token for this bond ("" for implicit).
    pub fn token(self) -> &'static str {
        match self {
            Bond::Implicit => "",
            Bond::Dot => ".",
            Bond::Single => "-",
            Bond::Double => "=",
            Bond::Triple => "#",
            Bond::Quadruple => "$",
            Bond::Aromatic => ":",
            Bond::Up => "/",
            Bond::Down => "\\",
        }
    }
}

impl fmt::Display for Bond {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// An atom as read from the input, before any molecule-level perception.
#[derive(Debug, Clone, PartialEq)]
pub enum Atom {
    /// Organic-subset atom written without brackets (e.g. `C`, `Cl`).
    Aliphatic(&'static Element),
    /// Aromatic-subset atom written without brackets (e.g. `c`, `n`).
    Aromatic(&'static Element),
    /// The `*` wildcard: an atom of unknown element.
    Unknown,
    /// A `[...]` atom with explicit properties. `element` is `None` for the
    /// bracket wildcard `[*]`.
    Bracket {
        isotope: Option<u32>,
        element: Option<&'static Element>,
        hydrogens: u32,
        charge: i32,
        atom_class: u32,
        aromatic: bool,
    },
    /// Unresolvable bracket content kept verbatim (lenient mode only).
    Label(String),
}

impl Atom {
    pub fn element(&self) -> Option<&'static Element> {
        match self {
            Atom::Aliphatic(e) | Atom::Aromatic(e) => Some(e),
            Atom::Bracket { element, .. } => *element,
            Atom::Unknown | Atom::Label(_) => None,
        }
    }

    pub fn is_aromatic(&self) -> bool {
        match self {
            Atom::Aromatic(_) => true,
            Atom::Bracket { aromatic, .. } => *aromatic,
            _ => false,
        }
    }

    /// Formal charge; 0 unless written in a bracket.
    pub fn charge(&self) -> i32 {
        match self {
            Atom::Bracket { charge, .. } => *charge,
            _ => 0,
        }
    }

    pub fn isotope(&self) -> Option<u32> {
        match self {
            Atom::Bracket { isotope, .. } => *isotope,
            _ => None,
        }
    }

    /// Explicit hydrogen count; 0 unless written in a bracket.
    pub fn hydrogens(&self) -> u32 {
        match self {
            Atom::Bracket { hydrogens, .. } => *hydrogens,
            _ => 0,
        }
    }

    pub fn atom_class(&self) -> u32 {
        match self {
            Atom::Bracket { atom_class, .. } => *atom_class,
            _ => 0,
        }
    }

    /// The verbatim text of an arbitrary-label atom.
    pub fn label(&self) -> Option<&str> {
        match self {
            Atom::Label(s) => Some(s),
            _ => None,
        }
    }
}

/// An undirected edge between two vertices. Directional bonds are stored as
/// written from `u` to `v`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    pub u: usize,
    pub v: usize,
    pub bond: Bond,
}

impl Edge {
    pub fn new(u: usize, v: usize, bond: Bond) -> Self {
        Edge { u, v, bond }
    }

    /// The endpoint that is not `x`. `x` must be an endpoint.
    pub fn other(&self, x: usize) -> usize {
        if x == self.u {
            self.v
        } else {
            self.u
        }
    }

    /// The bond as seen from endpoint `x`: directional bonds read inverted
    /// from the far endpoint.
    pub fn bond_for(&self, x: usize) -> Bond {
        if x == self.u {
            self.bond
        } else {
            self.bond.inverse()
        }
    }
}

/// A parsed chemical graph: atoms, edges, flag bits, stereo topologies, and
/// an optional title captured from the input suffix.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    atoms: Vec<Atom>,
    edges: Vec<Edge>,
    /// adjacency[v] = indices into `edges` of the edges incident to v
    adjacency: Vec<Vec<usize>>,
    flags: u32,
    title: String,
    topologies: BTreeMap<usize, Topology>,
}

impl Graph {
    /// The graph contains aromatic atoms or bonds.
    pub const HAS_AROM: u32 = 0x1;
    /// The graph contains atom-centred (tetrahedral/allenal) stereo.
    pub const HAS_ATM_STRO: u32 = 0x2;
    /// The graph contains directional (up/down) bonds.
    pub const HAS_BND_STRO: u32 = 0x4;
    /// Any stereochemistry at all.
    pub const HAS_STRO: u32 = Self::HAS_ATM_STRO | Self::HAS_BND_STRO;

    pub fn new() -> Self {
        Graph::default()
    }

    pub fn with_capacity(n: usize) -> Self {
        Graph {
            atoms: Vec::with_capacity(n),
            edges: Vec::with_capacity(n),
            adjacency: Vec::with_capacity(n),
            ..Graph::default()
        }
    }

    /// Append an atom, returning its vertex index.
    pub fn add_atom(&mut self, atom: Atom) -> usize {
        let v = self.atoms.len();
        self.atoms.push(atom);
        self.adjacency.push(Vec::new());
        v
    }

    /// Append an edge between existing vertices.
    pub fn add_edge(&mut self, edge: Edge) {
        let idx = self.edges.len();
        self.adjacency[edge.u].push(idx);
        self.adjacency[edge.v].push(idx);
        self.edges.push(edge);
    }

    pub fn atom(&self, v: usize) -> &Atom {
        &self.atoms[v]
    }

    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Number of vertices.
    pub fn order(&self) -> usize {
        self.atoms.len()
    }

    /// Number of edges.
    pub fn size(&self) -> usize {
        self.edges.len()
    }

    pub fn degree(&self, v: usize) -> usize {
        self.adjacency[v].len()
    }

    /// The edges incident to `v`, in the order they were added.
    pub fn edges_of(&self, v: usize) -> impl Iterator<Item = &Edge> + '_ {
        self.adjacency[v].iter().map(move |&i| &self.edges[i])
    }

    /// Neighbor vertices of `v`, in edge-insertion order.
    pub fn neighbors(&self, v: usize) -> impl Iterator<Item = usize> + '_ {
        self.edges_of(v).map(move |e| e.other(v))
    }

    pub fn adjacent(&self, u: usize, v: usize) -> bool {
        self.edges_of(u).any(|e| e.other(u) == v)
    }

    pub fn edge_between(&self, u: usize, v: usize) -> Option<&Edge> {
        self.edges_of(u).find(|e| e.other(u) == v)
    }

    /// Read the flag bits selected by `mask`.
    pub fn flags(&self, mask: u32) -> u32 {
        self.flags & mask
    }

    pub fn add_flags(&mut self, mask: u32) {
        self.flags |= mask;
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    /// Record a resolved stereo topology, keyed by its focus vertex.
    pub fn add_topology(&mut self, topology: Topology) {
        self.topologies.insert(topology.focus, topology);
    }

    pub fn topology_of(&self, v: usize) -> Option<&Topology> {
        self.topologies.get(&v)
    }

    pub fn topologies(&self) -> impl Iterator<Item = &Topology> + '_ {
        self.topologies.values()
    }

    /// Plain adjacency-list view, index-aligned with the vertex ordering.
    /// This is the input format of the isomorphism engine.
    pub fn to_adjacency_list(&self) -> Vec<Vec<usize>> {
        (0..self.order())
            .map(|v| self.neighbors(v).collect())
            .collect()
    }
}

impl Annotated for Graph {
    fn name(&self) -> &str {
        &self.title
    }
}

impl Summarizable for Graph {
    fn summary(&self) -> String {
        format!(
            "{}: {} atoms, {} bonds",
            if self.title.is_empty() { "Graph" } else { &self.title },
            self.order(),
            self.size()
        )
    }
}

impl ContentAddressable for Graph {
    fn content_hash(&self) -> String {
        let mut hasher = Sha256::new();

        // Canonical per-atom encodings, sorted so the digest ignores input order.
        let mut atom_codes: Vec<Vec<u8>> = self.atoms.iter().map(encode_atom).collect();
        atom_codes.sort();
        for code in &atom_codes {
            hasher.update(code);
        }

        // Edges normalized to (min, max, bond) and sorted.
        let mut edge_codes: Vec<(usize, usize, u8)> = self
            .edges
            .iter()
            .map(|e| {
                let (a, b) = if e.u <= e.v { (e.u, e.v) } else { (e.v, e.u) };
                (a, b, e.bond as u8)
            })
            .collect();
        edge_codes.sort_unstable();
        for (a, b, bond) in edge_codes {
            hasher.update(a.to_le_bytes());
            hasher.update(b.to_le_bytes());
            hasher.update([bond]);
        }

        hex::encode(hasher.finalize())
    }
}

fn encode_atom(atom: &Atom) -> Vec<u8> {
    let mut code = Vec::new();
    match atom {
        Atom::Aliphatic(e) => {
            code.push(0);
            code.push(e.atomic_number);
        }
        Atom::Aromatic(e) => {
            code.push(1);
            code.push(e.atomic_number);
        }
        Atom::Unknown => code.push(2),
        Atom::Bracket { isotope, element, hydrogens, charge, atom_class, aromatic } => {
            code.push(3);
            code.push(element.map_or(0, |e| e.atomic_number));
            code.extend(isotope.map_or(0, |i| i.wrapping_add(1)).to_le_bytes());
            code.extend(hydrogens.to_le_bytes());
            code.extend(charge.to_le_bytes());
            code.extend(atom_class.to_le_bytes());
            code.push(u8::from(*aromatic));
        }
        Atom::Label(s) => {
            code.push(4);
            code.extend(s.as_bytes());
        }
    }
    code
}
