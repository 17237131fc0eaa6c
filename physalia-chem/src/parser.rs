//! SMILES string parser.
//!
//! A single left-to-right scan builds the graph; stereo configurations are
//! recorded as they are read and resolved in a post-pass (see
//! [`crate::topology`]). A parser instance is single-use: parse each string
//! with a fresh call.

use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet};

use thiserror::Error;

use crate::buffer::CharBuffer;
use crate::element::{element_by_symbol, Element};
use crate::graph::{Atom, Bond, Edge, Graph};
use crate::topology::{self, Configuration, LocalArrangement};

/// Error raised when a SMILES string cannot be parsed, carrying the byte
/// offset at which the problem was detected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} (position {position})")]
pub struct InvalidSmiles {
    pub message: String,
    pub position: usize,
}

impl InvalidSmiles {
    pub(crate) fn new(message: impl Into<String>, position: usize) -> Self {
        InvalidSmiles {
            message: message.into(),
            position,
        }
    }
}

impl From<InvalidSmiles> for physalia_core::Error {
    fn from(e: InvalidSmiles) -> Self {
        physalia_core::Error::Parse(e.to_string())
    }
}

/// Parse a SMILES string into a [`Graph`] (lenient mode).
///
/// Lenient parsing accepts bare `H`/`D`/`T` atoms (expanded to their bracket
/// equivalents), abnormal aromatic elements, and unresolvable bracket content
/// (kept verbatim as an [`Atom::Label`]).
pub fn parse_smiles(smiles: &str) -> Result<Graph, InvalidSmiles> {
    SmilesParser::new(smiles, false).parse()
}

/// Parse a SMILES string into a [`Graph`], rejecting the non-standard forms
/// the lenient parser tolerates.
pub fn parse_smiles_strict(smiles: &str) -> Result<Graph, InvalidSmiles> {
    SmilesParser::new(smiles, true).parse()
}

/// An open ring bond: the vertex it was opened on and the bond symbol (if
/// any) written at the opening.
#[derive(Debug, Clone, Copy)]
struct RingBond {
    u: usize,
    bond: Bond,
}

/// Result of reading an element symbol inside a bracket atom.
enum Symbol {
    Wildcard,
    Element(&'static Element),
    Unrecognized,
}

struct SmilesParser<'a> {
    buffer: CharBuffer<'a>,
    g: Graph,
    /// Branch stack; the top is the atom the next atom bonds to.
    stack: Vec<usize>,
    /// Open ring bonds indexed by ring number (0-99).
    rings: Vec<Option<RingBond>>,
    /// Neighbor-visit order per vertex, tracked once a ring opens there.
    arrangement: BTreeMap<usize, LocalArrangement>,
    /// Deferred stereo configurations keyed by vertex.
    configurations: BTreeMap<usize, Configuration>,
    /// Pending bond, applied to the next atom or ring closure.
    bond: Bond,
    /// Pending configuration from the bracket atom being read.
    configuration: Configuration,
    /// Vertices that begin a new run: the first vertex and any vertex
    /// immediately after a dot. Needed to anchor implicit stereo references.
    start: BTreeSet<usize>,
    open_rings: usize,
    strict: bool,
    /// Vertices whose directional bonds need the post-parse consistency check.
    check_directional: Vec<bool>,
}

impl<'a> SmilesParser<'a> {
    fn new(input: &'a str, strict: bool) -> Self {
        SmilesParser {
            g: Graph::with_capacity(1 + 2 * input.len() / 3),
            buffer: CharBuffer::new(input),
            stack: Vec::with_capacity(10),
            rings: Vec::new(),
            arrangement: BTreeMap::new(),
            configurations: BTreeMap::new(),
            bond: Bond::Implicit,
            configuration: Configuration::Unknown,
            start: BTreeSet::new(),
            open_rings: 0,
            strict,
            check_directional: Vec::new(),
        }
    }

    fn parse(mut self) -> Result<Graph, InvalidSmiles> {
        self.read_smiles()?;
        if self.open_rings > 0 {
            return Err(self.error("unclosed ring detected"));
        }
        if self.stack.len() > 1 {
            return Err(self.error("unclosed branch detected"));
        }
        self.start.insert(0);
        if self.g.flags(Graph::HAS_STRO) != 0 {
            let pos = self.buffer.position();
            topology::create_topologies(
                &mut self.g,
                &self.configurations,
                &self.arrangement,
                &self.start,
                &mut self.check_directional,
                pos,
            )?;
        }
        Ok(self.g)
    }

    fn read_smiles(&mut self) -> Result<(), InvalidSmiles> {
        while let Some(c) = self.buffer.get() {
            match c {
                // aliphatic organic subset
                b'*' => self.add_atom(Atom::Unknown)?,
                b'B' => {
                    if self.buffer.get_if(b'r') {
                        self.add_organic("Br", false)?;
                    } else {
                        self.add_organic("B", false)?;
                    }
                }
                b'C' => {
                    if self.buffer.get_if(b'l') {
                        self.add_organic("Cl", false)?;
                    } else {
                        self.add_organic("C", false)?;
                    }
                }
                b'N' => self.add_organic("N", false)?,
                b'O' => self.add_organic("O", false)?,
                b'P' => self.add_organic("P", false)?,
                b'S' => self.add_organic("S", false)?,
                b'F' => self.add_organic("F", false)?,
                b'I' => self.add_organic("I", false)?,

                // aromatic organic subset
                b'b' => self.add_organic("B", true)?,
                b'c' => self.add_organic("C", true)?,
                b'n' => self.add_organic("N", true)?,
                b'o' => self.add_organic("O", true)?,
                b'p' => self.add_organic("P", true)?,
                b's' => self.add_organic("S", true)?,

                // bare hydrogen and its isotopes are auto-bracketed when lenient
                b'H' => {
                    if self.strict {
                        return Err(
                            self.error("hydrogens should be specified in square brackets - '[H]'")
                        );
                    }
                    self.add_atom(hydrogen(None))?;
                }
                b'D' => {
                    if self.strict {
                        return Err(self.error(
                            "deuterium should be specified as a hydrogen isotope - '[2H]'",
                        ));
                    }
                    self.add_atom(hydrogen(Some(2)))?;
                }
                b'T' => {
                    if self.strict {
                        return Err(self.error(
                            "tritium should be specified as a hydrogen isotope - '[3H]'",
                        ));
                    }
                    self.add_atom(hydrogen(Some(3)))?;
                }

                b'[' => {
                    let atom = self.read_bracket_atom()?;
                    self.add_atom(atom)?;
                }

                // ring bonds
                b'0'..=b'9' => self.ring(u32::from(c - b'0'))?,
                b'%' => {
                    let Some(rnum) = self.buffer.get_number_up_to(2) else {
                        return Err(self.error("a number (<digit>+) must follow '%'"));
                    };
                    self.ring(rnum)?;
                }

                // bond symbols
                b'-' => self.set_bond(Bond::Single)?,
                b'=' => self.set_bond(Bond::Double)?,
                b'#' => self.set_bond(Bond::Triple)?,
                b'$' => self.set_bond(Bond::Quadruple)?,
                b':' => {
                    self.set_bond(Bond::Aromatic)?;
                    self.g.add_flags(Graph::HAS_AROM);
                }
                b'/' => {
                    self.set_bond(Bond::Up)?;
                    self.g.add_flags(Graph::HAS_BND_STRO);
                }
                b'\\' => {
                    // tolerate C\\C=C/C - likely an escaping mistake
                    if self.bond != Bond::Implicit && self.bond != Bond::Down {
                        return Err(self.error("multiple bonds specified"));
                    }
                    self.bond = Bond::Down;
                    self.g.add_flags(Graph::HAS_BND_STRO);
                }
                b'.' => {
                    if self.bond != Bond::Implicit {
                        return Err(self.error("bond specified before disconnection"));
                    }
                    self.bond = Bond::Dot;
                }

                // branching
                b'(' => {
                    let Some(&top) = self.stack.last() else {
                        return Err(
                            self.error("cannot open branch - there were no previous atoms")
                        );
                    };
                    self.stack.push(top);
                }
                b')' => {
                    if self.stack.len() < 2 {
                        return Err(self.error("closing of an unopened branch"));
                    }
                    self.stack.pop();
                }

                // termination; a space or tab starts the title suffix
                b' ' | b'\t' => {
                    self.read_title();
                    return Ok(());
                }
                b'\n' | b'\r' => return Ok(()),

                _ => return Err(self.error(format!("unexpected character '{}'", c as char))),
            }
        }
        Ok(())
    }

    /// Add an atom, bonding it to the top of the branch stack unless the
    /// pending bond is a disconnection. Consumes the pending bond and
    /// configuration.
    fn add_atom(&mut self, atom: Atom) -> Result<(), InvalidSmiles> {
        let v = self.g.add_atom(atom);
        if let Some(u) = self.stack.pop() {
            if self.bond != Bond::Dot {
                if self.bond.is_directional() {
                    self.ensure_directional(u.max(v) + 1);
                    self.check_directional[u] = true;
                    self.check_directional[v] = true;
                }
                self.g.add_edge(Edge::new(u, v, self.bond));
            } else {
                self.start.insert(v);
            }
            if let Some(la) = self.arrangement.get_mut(&u) {
                la.add_vertex(v);
            }
        }
        self.stack.push(v);
        self.bond = Bond::Implicit;

        if self.configuration != Configuration::Unknown {
            self.g.add_flags(Graph::HAS_ATM_STRO);
            self.configurations.insert(v, self.configuration);
            self.configuration = Configuration::Unknown;
        }
        Ok(())
    }

    fn add_organic(&mut self, symbol: &str, aromatic: bool) -> Result<(), InvalidSmiles> {
        let Some(element) = element_by_symbol(symbol) else {
            return Err(self.error(format!("unknown element '{symbol}'")));
        };
        let atom = if aromatic {
            self.g.add_flags(Graph::HAS_AROM);
            Atom::Aromatic(element)
        } else {
            Atom::Aliphatic(element)
        };
        self.add_atom(atom)
    }

    /// Read a bracket atom. The grammar is
    /// `'[' isotope? symbol chiral? hcount? charge? class? ']'`; when lenient,
    /// content that does not resolve is captured verbatim up to the matching
    /// `]` instead of failing.
    fn read_bracket_atom(&mut self) -> Result<Atom, InvalidSmiles> {
        let start = self.buffer.position();
        if !self.buffer.has_remaining() {
            return Err(self.error("unclosed bracket atom"));
        }

        let isotope = self.buffer.get_number();
        let aromatic = matches!(self.buffer.peek(), Some(c) if c.is_ascii_lowercase());

        let element = match self.read_symbol() {
            Symbol::Wildcard => None,
            Symbol::Element(element) => {
                if aromatic {
                    if self.strict && !element.is_aromatic() {
                        return Err(self.error("abnormal aromatic element"));
                    }
                    self.g.add_flags(Graph::HAS_AROM);
                }
                Some(element)
            }
            Symbol::Unrecognized => {
                if self.strict {
                    return Err(self.error("unrecognised element symbol"));
                }
                return self.read_arbitrary_label(start);
            }
        };

        self.configuration = Configuration::read(&mut self.buffer)?;
        let hydrogens = read_hydrogens(&mut self.buffer);
        let charge = read_charge(&mut self.buffer);
        let atom_class = self.read_class()?;

        if !self.buffer.get_if(b']') {
            if self.strict {
                return Err(self.error("invalid bracket atom, expected ']'"));
            }
            return self.read_arbitrary_label(start);
        }

        Ok(Atom::Bracket {
            isotope,
            element,
            hydrogens,
            charge,
            atom_class,
            aromatic,
        })
    }

    /// Read a one- or two-letter element symbol, longest match first.
    /// Lowercase symbols are restricted to the aromatic-capable letters.
    fn read_symbol(&mut self) -> Symbol {
        match self.buffer.peek() {
            Some(b'*') => {
                self.buffer.get();
                Symbol::Wildcard
            }
            Some(c) if c.is_ascii_lowercase() => {
                self.buffer.get();
                let symbol = match c {
                    b'a' => self.buffer.get_if(b's').then_some("As"),
                    b's' => {
                        if self.buffer.get_if(b'e') {
                            Some("Se")
                        } else {
                            Some("S")
                        }
                    }
                    b't' => self.buffer.get_if(b'e').then_some("Te"),
                    b'b' => Some("B"),
                    b'c' => Some("C"),
                    b'n' => Some("N"),
                    b'o' => Some("O"),
                    b'p' => Some("P"),
                    _ => None,
                };
                match symbol.and_then(element_by_symbol) {
                    Some(element) => Symbol::Element(element),
                    None => Symbol::Unrecognized,
                }
            }
            Some(c) if c.is_ascii_uppercase() => {
                self.buffer.get();
                if let Some(n) = self.buffer.peek() {
                    if n.is_ascii_lowercase() {
                        let mut two = String::with_capacity(2);
                        two.push(c as char);
                        two.push(n as char);
                        if let Some(element) = element_by_symbol(&two) {
                            self.buffer.get();
                            return Symbol::Element(element);
                        }
                    }
                }
                let mut one = String::with_capacity(1);
                one.push(c as char);
                match element_by_symbol(&one) {
                    Some(element) => Symbol::Element(element),
                    None => Symbol::Unrecognized,
                }
            }
            _ => Symbol::Unrecognized,
        }
    }

    /// Capture unresolvable bracket content verbatim, honoring nested
    /// bracket depth. `start` is the offset just after the opening `[`.
    fn read_arbitrary_label(&mut self, start: usize) -> Result<Atom, InvalidSmiles> {
        let mut end = self.buffer.position();
        let mut depth = 1;
        while let Some(c) = self.buffer.get() {
            match c {
                b'[' => depth += 1,
                b']' => {
                    depth -= 1;
                    if depth == 0 {
                        break;
                    }
                }
                _ => {}
            }
            end += 1;
        }
        if depth != 0 {
            return Err(self.error("unparsable label in bracket atom"));
        }
        Ok(Atom::Label(self.buffer.substr(start, end)))
    }

    /// Atom class: `':'` followed by digits, leading zeros insignificant.
    fn read_class(&mut self) -> Result<u32, InvalidSmiles> {
        if self.buffer.get_if(b':') {
            if let Some(n) = self.buffer.get_number() {
                return Ok(n);
            }
            return Err(self.error("invalid atom class, <digit>+ must follow ':'"));
        }
        Ok(0)
    }

    /// Open or close the ring bond numbered `rnum`.
    fn ring(&mut self, rnum: u32) -> Result<(), InvalidSmiles> {
        if self.bond == Bond::Dot {
            return Err(self.error("a ring bond can not be a 'dot'"));
        }
        let Some(&u) = self.stack.last() else {
            return Err(self.error("ring bond without a preceding atom"));
        };
        let open = self.rings.get_mut(rnum as usize).and_then(Option::take);
        match open {
            Some(rbond) => self.close_ring(rnum, rbond, u),
            None => {
                self.open_ring(rnum, u);
                Ok(())
            }
        }
    }

    fn open_ring(&mut self, rnum: u32, u: usize) {
        let idx = rnum as usize;
        if idx >= self.rings.len() {
            self.rings.resize_with(idx + 1, || None);
        }
        self.rings[idx] = Some(RingBond { u, bond: self.bond });

        // record written order; ring closure would otherwise re-order this
        // neighbor relative to read order
        self.arrangement_of(u).add_ring(rnum);
        self.open_rings += 1;
        self.bond = Bond::Implicit;
    }

    fn close_ring(&mut self, rnum: u32, rbond: RingBond, v: usize) -> Result<(), InvalidSmiles> {
        let u = rbond.u;
        if u == v {
            return Err(self.error("endpoints of ringbond are the same - loops are not allowed"));
        }
        if self.g.adjacent(u, v) {
            return Err(self.error(
                "endpoints of ringbond are already connected - multi-edges are not allowed",
            ));
        }

        // the closing bond is read towards the opening atom
        let bond = self.decide_bond(rbond.bond, self.bond.inverse())?;
        if bond.is_directional() {
            self.ensure_directional(u.max(v) + 1);
            self.check_directional[u] = true;
            self.check_directional[v] = true;
        }
        self.g.add_edge(Edge::new(u, v, bond));
        self.bond = Bond::Implicit;
        if let Some(la) = self.arrangement.get_mut(&u) {
            la.close_ring(rnum, v);
        }
        self.open_rings -= 1;
        Ok(())
    }

    /// Pick the bond for a ring closure from the symbols written at the open
    /// and at the close: equal symbols agree, an implicit side defers to the
    /// other, anything else conflicts.
    fn decide_bond(&self, a: Bond, b: Bond) -> Result<Bond, InvalidSmiles> {
        if a == b {
            return Ok(a);
        }
        if a == Bond::Implicit {
            return Ok(b);
        }
        if b == Bond::Implicit {
            return Ok(a);
        }
        Err(self.error(format!(
            "ring closure bonds did not match, opened with '{a}' and closed with '{b}' - \
             note directional bonds ('/','\\') are relative"
        )))
    }

    /// The local arrangement for `u`, seeded with the neighbors already read.
    fn arrangement_of(&mut self, u: usize) -> &mut LocalArrangement {
        match self.arrangement.entry(u) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                let mut la = LocalArrangement::default();
                for e in self.g.edges_of(u) {
                    la.add_vertex(e.other(u));
                }
                entry.insert(la)
            }
        }
    }

    fn set_bond(&mut self, bond: Bond) -> Result<(), InvalidSmiles> {
        if self.bond != Bond::Implicit {
            return Err(self.error("multiple bonds specified"));
        }
        self.bond = bond;
        Ok(())
    }

    fn ensure_directional(&mut self, n: usize) {
        if self.check_directional.len() < n {
            self.check_directional.resize(n, false);
        }
    }

    /// Everything from the separator to end-of-line is the title.
    fn read_title(&mut self) {
        let start = self.buffer.position();
        let mut end = start;
        while let Some(c) = self.buffer.get() {
            if c == b'\n' || c == b'\r' {
                break;
            }
            end += 1;
        }
        let title = self.buffer.substr(start, end);
        self.g.set_title(title);
    }

    fn error(&self, message: impl Into<String>) -> InvalidSmiles {
        InvalidSmiles::new(message, self.buffer.position())
    }
}

fn hydrogen(isotope: Option<u32>) -> Atom {
    Atom::Bracket {
        isotope,
        element: element_by_symbol("H"),
        hydrogens: 0,
        charge: 0,
        atom_class: 0,
        aromatic: false,
    }
}

/// Hydrogen count of a bracket atom: `H` alone is 1, `H<digits>` explicit,
/// absence is 0.
fn read_hydrogens(buffer: &mut CharBuffer) -> u32 {
    if buffer.get_if(b'H') {
        buffer.get_number().unwrap_or(1)
    } else {
        0
    }
}

/// Formal charge of a bracket atom. Repeated signs accumulate one step each;
/// a sign followed directly by digits is an explicit magnitude. The two
/// forms compose by accumulation, so `[N+-]` nets 0.
fn read_charge(buffer: &mut CharBuffer) -> i32 {
    read_charge_acc(0, buffer)
}

fn read_charge_acc(acc: i32, buffer: &mut CharBuffer) -> i32 {
    if buffer.get_if(b'+') {
        return if buffer.next_is_digit() {
            acc + buffer.get_number().unwrap_or(0) as i32
        } else {
            read_charge_acc(acc + 1, buffer)
        };
    }
    if buffer.get_if(b'-') {
        return if buffer.next_is_digit() {
            acc - buffer.get_number().unwrap_or(0) as i32
        } else {
            read_charge_acc(acc - 1, buffer)
        };
    }
    acc
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::{Configuration, ConfigurationKind};

    #[test]
    fn parse_ethanol() {
        let g = parse_smiles("CCO").unwrap();
        assert_eq!(g.order(), 3);
        assert_eq!(g.size(), 2);
        assert!(g.adjacent(0, 1));
        assert!(g.adjacent(1, 2));
        assert_eq!(g.edges()[0].bond, Bond::Implicit);
        assert_eq!(g.flags(Graph::HAS_AROM), 0);
        assert_eq!(g.title(), "");
    }

    #[test]
    fn parse_explicit_single_bond() {
        let g = parse_smiles("C-C").unwrap();
        assert_eq!(g.edges()[0].bond, Bond::Single);
    }

    #[test]
    fn parse_cyclohexane_ring() {
        let g = parse_smiles("C1CCCCC1").unwrap();
        assert_eq!(g.order(), 6);
        assert_eq!(g.size(), 6);
        assert!(g.adjacent(0, 5));
    }

    #[test]
    fn parse_branch_star() {
        let g = parse_smiles("C(C)(C)C").unwrap();
        assert_eq!(g.order(), 4);
        assert_eq!(g.degree(0), 3);
        assert_eq!(g.degree(1), 1);
    }

    #[test]
    fn parse_benzene() {
        let g = parse_smiles("c1ccccc1").unwrap();
        assert_eq!(g.order(), 6);
        assert_eq!(g.size(), 6);
        assert_ne!(g.flags(Graph::HAS_AROM), 0);
        assert!(g.atoms().iter().all(|a| a.is_aromatic()));
    }

    #[test]
    fn parse_two_letter_organic() {
        let g = parse_smiles("ClCBr").unwrap();
        assert_eq!(g.order(), 3);
        assert_eq!(g.atom(0).element().unwrap().symbol, "Cl");
        assert_eq!(g.atom(2).element().unwrap().symbol, "Br");
    }

    #[test]
    fn parse_wildcard() {
        let g = parse_smiles("C*C").unwrap();
        assert_eq!(g.order(), 3);
        assert!(g.atom(1).element().is_none());
    }

    #[test]
    fn parse_percent_ring_number() {
        let g = parse_smiles("C%10CCCCCCCCC%10").unwrap();
        assert_eq!(g.order(), 10);
        assert_eq!(g.size(), 10);
    }

    #[test]
    fn parse_disconnected() {
        let g = parse_smiles("C.C").unwrap();
        assert_eq!(g.order(), 2);
        assert_eq!(g.size(), 0);
    }

    #[test]
    fn parse_title() {
        let g = parse_smiles("CCO ethanol").unwrap();
        assert_eq!(g.order(), 3);
        assert_eq!(g.title(), "ethanol");
    }

    #[test]
    fn newline_terminates_molecule() {
        let g = parse_smiles("CC\nCC").unwrap();
        assert_eq!(g.order(), 2);
    }

    #[test]
    fn closing_unopened_branch_fails() {
        let e = parse_smiles("C)").unwrap_err();
        assert!(e.message.contains("unopened branch"), "{e}");
        assert!(parse_smiles(")").is_err());
    }

    #[test]
    fn open_branch_without_atom_fails() {
        assert!(parse_smiles("(C)").is_err());
    }

    #[test]
    fn unclosed_branch_fails() {
        let e = parse_smiles("C(C").unwrap_err();
        assert!(e.message.contains("unclosed branch"), "{e}");
    }

    #[test]
    fn unclosed_ring_fails() {
        let e = parse_smiles("C1CC").unwrap_err();
        assert!(e.message.contains("unclosed ring"), "{e}");
    }

    #[test]
    fn ring_bond_decided_at_either_end() {
        let g = parse_smiles("C=1CCCCC1").unwrap();
        assert_eq!(g.edge_between(0, 5).unwrap().bond, Bond::Double);
        let g = parse_smiles("C1CCCCC=1").unwrap();
        assert_eq!(g.edge_between(0, 5).unwrap().bond, Bond::Double);
        let g = parse_smiles("C=1CCCCC=1").unwrap();
        assert_eq!(g.edge_between(0, 5).unwrap().bond, Bond::Double);
    }

    #[test]
    fn ring_bond_mismatch_fails() {
        let e = parse_smiles("C=1CCCCC#1").unwrap_err();
        assert!(e.message.contains("did not match"), "{e}");
    }

    #[test]
    fn ring_self_loop_fails() {
        assert!(parse_smiles("C11").is_err());
    }

    #[test]
    fn ring_duplicate_edge_fails() {
        assert!(parse_smiles("C12CC12").is_err());
    }

    #[test]
    fn ring_after_dot_fails() {
        assert!(parse_smiles("C.1CC1").is_err());
    }

    #[test]
    fn ring_number_reuse_is_allowed() {
        let g = parse_smiles("C1CC1C1CC1").unwrap();
        assert_eq!(g.order(), 6);
        assert_eq!(g.size(), 7);
    }

    #[test]
    fn multiple_bond_symbols_fail() {
        assert!(parse_smiles("C=-C").is_err());
        assert!(parse_smiles("C=/C").is_err());
    }

    #[test]
    fn double_backslash_is_tolerated() {
        let g = parse_smiles("F\\\\C=C/F").unwrap();
        assert_eq!(g.edges()[0].bond, Bond::Down);
    }

    #[test]
    fn directional_bonds_parse() {
        let g = parse_smiles("F/C=C/F").unwrap();
        assert_ne!(g.flags(Graph::HAS_BND_STRO), 0);
        assert_eq!(g.edges()[0].bond, Bond::Up);
    }

    #[test]
    fn conflicting_directional_bonds_fail() {
        let e = parse_smiles("F/C(\\N)=C/F").unwrap_err();
        assert!(e.message.contains("multiple directional bonds"), "{e}");
    }

    #[test]
    fn charge_forms() {
        assert_eq!(parse_smiles("[N+]").unwrap().atom(0).charge(), 1);
        assert_eq!(parse_smiles("[N++]").unwrap().atom(0).charge(), 2);
        assert_eq!(parse_smiles("[N+2]").unwrap().atom(0).charge(), 2);
        assert_eq!(parse_smiles("[O-]").unwrap().atom(0).charge(), -1);
        assert_eq!(parse_smiles("[O--]").unwrap().atom(0).charge(), -2);
        assert_eq!(parse_smiles("[O-2]").unwrap().atom(0).charge(), -2);
        // accumulation makes this net zero
        assert_eq!(parse_smiles("[N+-]").unwrap().atom(0).charge(), 0);
    }

    #[test]
    fn bracket_atom_properties() {
        let g = parse_smiles("[13CH4]").unwrap();
        let a = g.atom(0);
        assert_eq!(a.isotope(), Some(13));
        assert_eq!(a.element().unwrap().symbol, "C");
        assert_eq!(a.hydrogens(), 4);

        let g = parse_smiles("[NH4+]").unwrap();
        assert_eq!(g.atom(0).hydrogens(), 4);
        assert_eq!(g.atom(0).charge(), 1);
    }

    #[test]
    fn hydrogen_count_defaults() {
        assert_eq!(parse_smiles("[CH]").unwrap().atom(0).hydrogens(), 1);
        assert_eq!(parse_smiles("[CH0]").unwrap().atom(0).hydrogens(), 0);
        assert_eq!(parse_smiles("[C]").unwrap().atom(0).hydrogens(), 0);
    }

    #[test]
    fn atom_class_parses() {
        assert_eq!(parse_smiles("[CH4:5]").unwrap().atom(0).atom_class(), 5);
        assert_eq!(parse_smiles("[CH4:005]").unwrap().atom(0).atom_class(), 5);
        assert!(parse_smiles("[CH4:]").is_err());
    }

    #[test]
    fn bracket_two_letter_wins() {
        // "Sc" reads as scandium, not aromatic carbon on sulfur
        let g = parse_smiles("[Sc]").unwrap();
        assert_eq!(g.atom(0).element().unwrap().symbol, "Sc");
    }

    #[test]
    fn bracket_wildcard() {
        let g = parse_smiles("[*]").unwrap();
        assert!(g.atom(0).element().is_none());
    }

    #[test]
    fn unclosed_bracket_fails() {
        assert!(parse_smiles("[").is_err());
        assert!(parse_smiles("[C").is_err());
    }

    #[test]
    fn arbitrary_label_when_lenient() {
        let g = parse_smiles("[Xz]").unwrap();
        assert_eq!(g.atom(0).label(), Some("Xz"));
        assert!(parse_smiles_strict("[Xz]").is_err());
    }

    #[test]
    fn arbitrary_label_honors_nesting() {
        let g = parse_smiles("[Foo[bar]]").unwrap();
        assert_eq!(g.atom(0).label(), Some("Foo[bar]"));
        assert!(parse_smiles("[Foo[bar]").is_err());
    }

    #[test]
    fn bare_hydrogen_isotopes_lenient_only() {
        let g = parse_smiles("D").unwrap();
        assert_eq!(g.atom(0).isotope(), Some(2));
        assert_eq!(g.atom(0).element().unwrap().symbol, "H");
        let g = parse_smiles("T").unwrap();
        assert_eq!(g.atom(0).isotope(), Some(3));
        assert!(parse_smiles_strict("H").is_err());
        assert!(parse_smiles_strict("D").is_err());
        assert!(parse_smiles_strict("T").is_err());
    }

    #[test]
    fn abnormal_aromatic_element_strict_only() {
        let g = parse_smiles("[te]").unwrap();
        assert!(g.atom(0).is_aromatic());
        assert_eq!(g.atom(0).element().unwrap().symbol, "Te");
        assert!(parse_smiles_strict("[te]").is_err());
        assert!(parse_smiles_strict("[se]").is_ok());
    }

    #[test]
    fn errors_carry_position() {
        let e = parse_smiles("CC?C").unwrap_err();
        assert_eq!(e.position, 3);
        assert!(e.to_string().contains("position 3"));
    }

    #[test]
    fn tetrahedral_topology_with_implicit_hydrogen() {
        // L-alanine backbone: the stereocentre has 3 explicit neighbors, so
        // the focus stands in for the hydrogen after the first neighbor
        let g = parse_smiles("N[C@@H](C)C(=O)O").unwrap();
        assert_ne!(g.flags(Graph::HAS_ATM_STRO), 0);
        let t = g.topology_of(1).unwrap();
        assert_eq!(t.configuration, Configuration::Th2);
        assert_eq!(t.carriers, vec![0, 1, 2, 3]);
    }

    #[test]
    fn tetrahedral_topology_at_start() {
        let g = parse_smiles("[C@H](N)(O)C").unwrap();
        let t = g.topology_of(0).unwrap();
        assert_eq!(t.configuration, Configuration::Th1);
        assert_eq!(t.carriers, vec![0, 1, 2, 3]);
    }

    #[test]
    fn ring_closure_uses_written_neighbor_order() {
        // the ring closes last in edge order but second in written order
        let g = parse_smiles("O[C@]1(C)CC1").unwrap();
        let t = g.topology_of(1).unwrap();
        assert_eq!(t.carriers, vec![0, 4, 2, 3]);
    }

    #[test]
    fn extended_tetrahedral_topology() {
        let g = parse_smiles("OC=[C@]=CN").unwrap();
        let t = g.topology_of(2).unwrap();
        assert_eq!(t.configuration, Configuration::Al1);
        assert_eq!(t.carriers, vec![0, 1, 3, 4]);
        assert_eq!(t.configuration.kind(), ConfigurationKind::ExtendedTetrahedral);
    }

    #[test]
    fn underspecified_extended_tetrahedral_is_dropped() {
        let g = parse_smiles("C=[C@]=CN").unwrap();
        assert!(g.topology_of(1).is_none());
    }

    #[test]
    fn explicit_th_token() {
        let g = parse_smiles("N[C@TH1H](C)O").unwrap();
        assert_eq!(g.topology_of(1).unwrap().configuration, Configuration::Th1);
    }

    #[test]
    fn invalid_smiles_converts_to_core_error() {
        let e = parse_smiles("C)").unwrap_err();
        let core: physalia_core::Error = e.into();
        assert!(matches!(core, physalia_core::Error::Parse(_)));
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    /// Strategy for valid simple SMILES: chains of organic subset atoms
    fn simple_smiles() -> impl Strategy<Value = String> {
        let atoms = prop_oneof![
            Just("C"),
            Just("N"),
            Just("O"),
            Just("S"),
            Just("c"),
            Just("n"),
            Just("o"),
        ];
        proptest::collection::vec(atoms, 1..=20).prop_map(|parts| parts.join(""))
    }

    proptest! {
        #[test]
        fn parse_smiles_does_not_panic(s in "\\PC{0,100}") {
            let _ = parse_smiles(&s);
            let _ = parse_smiles_strict(&s);
        }

        #[test]
        fn accepted_chains_are_paths(smi in simple_smiles()) {
            if let Ok(g) = parse_smiles(&smi) {
                prop_assert!(g.order() > 0);
                prop_assert_eq!(g.size(), g.order() - 1);
            }
        }

        #[test]
        fn strict_accepts_subset_of_lenient(s in "\\PC{0,60}") {
            if parse_smiles_strict(&s).is_ok() {
                prop_assert!(parse_smiles(&s).is_ok());
            }
        }
    }
}
