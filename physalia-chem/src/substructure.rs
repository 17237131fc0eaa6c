//! Substructure search over parsed graphs.
//!
//! Wires the pieces of the data flow together: graphs become adjacency
//! lists, a [`VfState`] searches with chemical feasibility, and the raw
//! mapping stream is deduplicated by edge footprint.

use crate::filters::UniqueBondMatches;
use crate::graph::{Atom, Bond, Edge, Graph};
use crate::vf::{VfState, UNMAPPED};

/// A single substructure hit.
#[derive(Debug, Clone, PartialEq)]
pub struct SubstructureMatch {
    /// Pairs of (query_atom_idx, target_atom_idx).
    pub atom_mapping: Vec<(usize, usize)>,
}

/// Check whether `target` contains `query` as a substructure.
pub fn has_substructure(target: &Graph, query: &Graph) -> bool {
    !search_mappings(target, query, true).is_empty()
}

/// Find the substructure occurrences of `query` in `target`, one hit per
/// distinct target-edge footprint.
pub fn find_substructure_matches(target: &Graph, query: &Graph) -> Vec<SubstructureMatch> {
    let mut filter = UniqueBondMatches::new(query.to_adjacency_list());
    search_mappings(target, query, false)
        .into_iter()
        .filter(|mapping| filter.apply(mapping))
        .map(|mapping| SubstructureMatch {
            atom_mapping: mapping.into_iter().enumerate().collect(),
        })
        .collect()
}

/// All raw vertex mappings of `query` into `target`, symmetric duplicates
/// included.
pub fn find_all_mappings(target: &Graph, query: &Graph) -> Vec<Vec<usize>> {
    search_mappings(target, query, false)
}

fn search_mappings(target: &Graph, query: &Graph, early_exit: bool) -> Vec<Vec<usize>> {
    if query.order() == 0 || query.order() > target.order() || query.size() > target.size() {
        return Vec::new();
    }
    if !element_counts_compatible(query, target) {
        return Vec::new();
    }

    let q_adj = query.to_adjacency_list();
    let t_adj = target.to_adjacency_list();

    // Injected feasibility: element/aromaticity/charge/isotope agreement for
    // the atoms, and every query bond towards an already-mapped neighbor
    // must land on a compatible target bond.
    let feasibility = |n: usize, m: usize, m1: &[usize], _m2: &[usize]| -> bool {
        if !atoms_compatible(query.atom(n), target.atom(m)) {
            return false;
        }
        for &w in &q_adj[n] {
            let t = m1[w];
            if t == UNMAPPED {
                continue;
            }
            let Some(qe) = query.edge_between(n, w) else {
                return false;
            };
            match target.edge_between(m, t) {
                None => return false,
                Some(te) => {
                    if normalized_bond(query, qe) != normalized_bond(target, te) {
                        return false;
                    }
                }
            }
        }
        true
    };

    let mut state = VfState::new(&q_adj, &t_adj, feasibility);
    state.search(early_exit)
}

/// Cheap pre-filter: the target must carry at least as many atoms of every
/// element as the query asks for. Wildcards are exempt.
fn element_counts_compatible(query: &Graph, target: &Graph) -> bool {
    let mut q = [0u16; 55];
    let mut t = [0u16; 55];
    for a in query.atoms() {
        if let Some(e) = a.element() {
            q[e.atomic_number as usize] += 1;
        }
    }
    for a in target.atoms() {
        if let Some(e) = a.element() {
            t[e.atomic_number as usize] += 1;
        }
    }
    q.iter().zip(t.iter()).all(|(a, b)| a <= b)
}

/// A query atom of unknown element (`*` or an arbitrary label) matches any
/// target atom; otherwise the listed properties must agree.
fn atoms_compatible(q: &Atom, t: &Atom) -> bool {
    let Some(qe) = q.element() else {
        return true;
    };
    let Some(te) = t.element() else {
        return false;
    };
    if qe.atomic_number != te.atomic_number {
        return false;
    }
    if q.is_aromatic() != t.is_aromatic() {
        return false;
    }
    if q.charge() != t.charge() {
        return false;
    }
    if let Some(iso) = q.isotope() {
        if t.isotope() != Some(iso) {
            return false;
        }
    }
    true
}

/// Bond order for matching: an implicit bond between aromatic atoms is
/// aromatic, otherwise single; directional bonds are single.
fn normalized_bond(g: &Graph, e: &Edge) -> Bond {
    match e.bond {
        Bond::Implicit => {
            if g.atom(e.u).is_aromatic() && g.atom(e.v).is_aromatic() {
                Bond::Aromatic
            } else {
                Bond::Single
            }
        }
        Bond::Up | Bond::Down => Bond::Single,
        b => b,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_smiles;

    #[test]
    fn benzene_in_phenol() {
        let phenol = parse_smiles("Oc1ccccc1").unwrap();
        let benzene = parse_smiles("c1ccccc1").unwrap();
        assert!(has_substructure(&phenol, &benzene));
        let matches = find_substructure_matches(&phenol, &benzene);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].atom_mapping.len(), 6);
    }

    #[test]
    fn no_benzene_in_cyclohexane() {
        let cyclohexane = parse_smiles("C1CCCCC1").unwrap();
        let benzene = parse_smiles("c1ccccc1").unwrap();
        assert!(!has_substructure(&cyclohexane, &benzene));
    }

    #[test]
    fn naphthalene_has_two_benzene_rings() {
        let naphthalene = parse_smiles("c1ccc2ccccc2c1").unwrap();
        let benzene = parse_smiles("c1ccccc1").unwrap();
        let raw = find_all_mappings(&naphthalene, &benzene);
        let unique = find_substructure_matches(&naphthalene, &benzene);
        assert!(raw.len() > unique.len());
        assert_eq!(unique.len(), 2);
    }

    #[test]
    fn ether_fragment_in_ethanol() {
        let ethanol = parse_smiles("CCO").unwrap();
        let fragment = parse_smiles("CO").unwrap();
        assert!(has_substructure(&ethanol, &fragment));
        let matches = find_substructure_matches(&ethanol, &fragment);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].atom_mapping, vec![(0, 1), (1, 2)]);
    }

    #[test]
    fn bond_order_must_match() {
        let butene = parse_smiles("CC=CC").unwrap();
        let butane = parse_smiles("CCCC").unwrap();
        let ethene = parse_smiles("C=C").unwrap();
        assert!(has_substructure(&butene, &ethene));
        assert!(!has_substructure(&butane, &ethene));
    }

    #[test]
    fn charge_must_match() {
        let ammonium = parse_smiles("[NH4+]").unwrap();
        let amine = parse_smiles("N").unwrap();
        assert!(!has_substructure(&ammonium, &amine));
        assert!(!has_substructure(&amine, &ammonium));
        assert!(has_substructure(&ammonium, &parse_smiles("[N+]").unwrap()));
    }

    #[test]
    fn isotope_constrains_query_only() {
        let labelled = parse_smiles("[13CH4]").unwrap();
        assert!(has_substructure(&labelled, &parse_smiles("[13C]").unwrap()));
        assert!(has_substructure(&labelled, &parse_smiles("[C]").unwrap()));
        let plain = parse_smiles("[CH4]").unwrap();
        assert!(!has_substructure(&plain, &parse_smiles("[13C]").unwrap()));
    }

    #[test]
    fn wildcard_matches_any_atom() {
        let benzene = parse_smiles("c1ccccc1").unwrap();
        let star = parse_smiles("*").unwrap();
        assert!(has_substructure(&benzene, &star));
        // the wildcard itself is not aromatic, so the ring bonds are written out
        let pyridine = parse_smiles("c1ccncc1").unwrap();
        let any_in_ring = parse_smiles("c:*:c").unwrap();
        assert!(has_substructure(&pyridine, &any_in_ring));
    }

    #[test]
    fn empty_or_oversized_query_never_matches() {
        let ethanol = parse_smiles("CCO").unwrap();
        assert!(!has_substructure(&ethanol, &parse_smiles("").unwrap()));
        assert!(!has_substructure(&ethanol, &parse_smiles("CCCC").unwrap()));
    }

    #[test]
    fn disconnected_query_maps_both_fragments() {
        let mix = parse_smiles("CC.O").unwrap();
        let query = parse_smiles("C.O").unwrap();
        assert!(has_substructure(&mix, &query));
    }
}
