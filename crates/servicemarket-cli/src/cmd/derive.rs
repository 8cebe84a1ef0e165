use anyhow::{anyhow, Result};
use serde::Serialize;
use servicemarket_client::derive as derive_address;

use crate::output::Output;
use crate::solana::client::Settings;

#[derive(Debug, Serialize)]
pub struct DeriveOut {
    pub program_id: String,
    pub seeds: Vec<String>,
    pub address: String,
    pub bump: u8,
}

pub fn run(out: Output, settings: &Settings, seeds: &[String], hex_seeds: bool) -> Result<()> {
    let raw = seed_bytes(seeds, hex_seeds)?;
    let slices: Vec<&[u8]> = raw.iter().map(Vec::as_slice).collect();
    let derived = derive_address(&slices, &settings.program_id)?;

    out.print(&DeriveOut {
        program_id: settings.program_id.to_string(),
        seeds: seeds.to_vec(),
        address: derived.address.to_string(),
        bump: derived.bump,
    })
}

fn seed_bytes(seeds: &[String], hex_seeds: bool) -> Result<Vec<Vec<u8>>> {
    seeds
        .iter()
        .map(|s| {
            if hex_seeds {
                hex::decode(s).map_err(|e| anyhow!("seed `{s}` is not hex: {e}"))
            } else {
                Ok(s.as_bytes().to_vec())
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_and_utf8_seeds_agree() {
        let utf8 = seed_bytes(&["servicemarket".to_string()], false).unwrap();
        let hexed = seed_bytes(&[hex::encode("servicemarket")], true).unwrap();
        assert_eq!(utf8, hexed);
    }

    #[test]
    fn bad_hex_seed() {
        assert!(seed_bytes(&["zz".to_string()], true).is_err());
    }
}
