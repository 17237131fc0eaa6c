//! SMILES parsing and subgraph-isomorphism search for the Physalia
//! cheminformatics ecosystem.
//!
//! Two subsystems live here. The parser turns SMILES line notation into a
//! labelled multigraph with bond orders, ring closures, and stereo
//! topologies; the isomorphism engine finds mappings of a query graph into a
//! target graph under pluggable feasibility rules, powering substructure
//! search.
//!
//! # Example
//!
//! ```
//! use physalia_chem::{has_substructure, parse_smiles};
//!
//! // Parse ethanol from SMILES
//! let ethanol = parse_smiles("CCO").unwrap();
//! assert_eq!(ethanol.order(), 3);
//! assert_eq!(ethanol.size(), 2);
//!
//! // Substructure search
//! let fragment = parse_smiles("CO").unwrap();
//! assert!(has_substructure(&ethanol, &fragment));
//! ```

pub mod buffer;
pub mod element;
pub mod filters;
pub mod graph;
pub mod parser;
pub mod substructure;
pub mod topology;
pub mod ullmann;
pub mod vf;

pub use element::{element_by_number, element_by_symbol, Element};
pub use filters::UniqueBondMatches;
pub use graph::{Atom, Bond, Edge, Graph};
pub use parser::{parse_smiles, parse_smiles_strict, InvalidSmiles};
pub use substructure::{find_all_mappings, find_substructure_matches, has_substructure, SubstructureMatch};
pub use topology::{Configuration, ConfigurationKind, Topology};
pub use ullmann::CompatibilityMatrix;
pub use vf::{Feasibility, VfState, UNMAPPED};
