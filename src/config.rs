//! Network topologies described as data.
//!
//! A config names only layer sizes and built-in activations; trained
//! parameters are never part of it.
//!
//! ```
//! use feedforward::config::NetworkConfig;
//!
//! let config = NetworkConfig::from_json(
//!     r#"{ "layers": [
//!         { "size": 2, "activation": "linear" },
//!         { "size": 3, "activation": { "leaky_relu": 0.1 } },
//!         { "size": 1, "activation": "sigmoid" }
//!     ] }"#,
//! )
//! .unwrap();
//! let network = config.build().unwrap();
//! assert_eq!(network.layer_sizes(), &[2, 3, 1]);
//! ```

use crate::activation::Activator;
use crate::error::Result;
use crate::neural_network::{LayerSpec, Network};

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LayerConfig {
    pub size: usize,
    pub activation: Activator,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct NetworkConfig {
    pub layers: Vec<LayerConfig>,
}

impl NetworkConfig {
    /// Starts a topology from its input layer.
    pub fn new(input_size: usize) -> Self {
        NetworkConfig {
            layers: vec![LayerConfig {
                size: input_size,
                activation: Activator::Linear,
            }],
        }
    }

    /// Appends a layer.
    pub fn layer(mut self, size: usize, activation: Activator) -> Self {
        self.layers.push(LayerConfig { size, activation });
        self
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn layer_specs(&self) -> Vec<LayerSpec> {
        self.layers
            .iter()
            .map(|layer| LayerSpec::new(layer.size, layer.activation))
            .collect()
    }

    /// Builds a randomly initialized network with this topology.
    pub fn build(&self) -> Result<Network> {
        Network::new(self.layer_specs())
    }

    pub fn build_with_rng<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Network> {
        Network::with_rng(self.layer_specs(), rng)
    }
}
