//! CSV network loader.
//!
//! # CSV format
//!
//! One row per directed link.  Link ids must be dense and appear in order
//! (`0, 1, 2, …`) because a `LinkId` is an index into the network.  Node ids
//! may be sparse; the node set grows to cover the largest id seen.
//!
//! ```csv
//! link_id,from_node,to_node,length_m,freespeed_mps
//! 0,0,1,500.0,10.0
//! 1,1,0,500.0,10.0
//! 2,1,2,300.0,15.0
//! ```

use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use fb_core::{LinkId, NodeId};

use crate::network::{Network, NetworkBuilder};
use crate::NetworkError;

// ── CSV record ────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct LinkRecord {
    link_id:       u32,
    from_node:     u32,
    to_node:       u32,
    length_m:      f64,
    freespeed_mps: f64,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load a [`Network`] from a CSV file.
pub fn load_network_csv(path: &Path) -> Result<Network, NetworkError> {
    let file = std::fs::File::open(path).map_err(NetworkError::Io)?;
    let network = load_network_reader(file)?;
    log::info!(
        "loaded network from {}: {} nodes, {} links",
        path.display(),
        network.node_count(),
        network.link_count()
    );
    Ok(network)
}

/// Like [`load_network_csv`] but accepts any `Read` source.
pub fn load_network_reader<R: Read>(reader: R) -> Result<Network, NetworkError> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut builder = NetworkBuilder::new();

    for result in csv_reader.deserialize::<LinkRecord>() {
        let row = result.map_err(|e| NetworkError::Parse(e.to_string()))?;

        let expected = builder.link_count() as u32;
        if row.link_id != expected {
            return Err(NetworkError::Parse(format!(
                "link ids must be dense and ordered: expected {expected}, found {}",
                row.link_id
            )));
        }
        if !(row.freespeed_mps.is_finite() && row.freespeed_mps > 0.0) {
            return Err(NetworkError::Parse(format!(
                "link {}: freespeed_mps must be > 0, got {}",
                row.link_id, row.freespeed_mps
            )));
        }
        if !(row.length_m.is_finite() && row.length_m >= 0.0) {
            return Err(NetworkError::Parse(format!(
                "link {}: length_m must be >= 0, got {}",
                row.link_id, row.length_m
            )));
        }

        let id = builder.add_link(
            NodeId(row.from_node),
            NodeId(row.to_node),
            row.length_m,
            row.freespeed_mps,
        );
        debug_assert_eq!(id, LinkId(row.link_id));
    }

    Ok(builder.build())
}
