//! Decision-forest classifier deserialized from a JSON artifact.
//!
//! The artifact is produced by an external training process; this crate
//! only loads it and runs inference. Each tree is array-encoded with the
//! root at index 0; child indices must point forward in the node array,
//! which rules out cycles and bounds every descent by the node count.

use ndarray::{Array2, ArrayView1};
use serde::{Deserialize, Serialize};

/// A predicted class label. Artifacts may use integer or string labels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Label {
    Int(i64),
    Text(String),
}

/// One node of an array-encoded decision tree.
#[derive(Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Node {
    /// Interior node: descend left when `x[feature] <= threshold`.
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    /// Terminal node carrying a class index into `ModelArtifact::classes`.
    Leaf { class: usize },
}

/// A single decision tree, root at `nodes[0]`.
#[derive(Debug, Serialize, Deserialize)]
pub struct Tree {
    pub nodes: Vec<Node>,
}

impl Tree {
    /// Walks one feature vector down to a leaf and returns its class index.
    ///
    /// Assumes the tree passed structural validation: all indices are in
    /// bounds and children point forward, so the walk always terminates.
    fn decide(&self, features: ArrayView1<'_, f64>) -> usize {
        let mut index = 0;
        loop {
            match &self.nodes[index] {
                Node::Leaf { class } => return *class,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    index = if features[*feature] <= *threshold {
                        *left
                    } else {
                        *right
                    };
                }
            }
        }
    }
}

/// The serialized form of the model, as written by the training process.
#[derive(Debug, Serialize, Deserialize)]
pub struct ModelArtifact {
    /// Expected input dimensionality.
    pub n_features: usize,
    /// Output labels, indexed by the class ids stored in tree leaves.
    pub classes: Vec<Label>,
    pub trees: Vec<Tree>,
}

/// A validated, immutable-after-load classification model.
pub struct Model {
    artifact: ModelArtifact,
}

impl Model {
    /// Validates the artifact structure and wraps it into a usable model.
    ///
    /// Checks that every feature index, class id, and child index is in
    /// bounds, and that children always point forward in the node array.
    pub fn from_artifact(artifact: ModelArtifact) -> Result<Self, String> {
        if artifact.n_features == 0 {
            return Err("n_features must be greater than zero".to_string());
        }
        if artifact.classes.is_empty() {
            return Err("artifact declares no classes".to_string());
        }
        if artifact.trees.is_empty() {
            return Err("artifact contains no trees".to_string());
        }

        for (t, tree) in artifact.trees.iter().enumerate() {
            if tree.nodes.is_empty() {
                return Err(format!("tree {} has no nodes", t));
            }
            for (n, node) in tree.nodes.iter().enumerate() {
                match node {
                    Node::Leaf { class } => {
                        if *class >= artifact.classes.len() {
                            return Err(format!(
                                "tree {} node {} references unknown class {}",
                                t, n, class
                            ));
                        }
                    }
                    Node::Split {
                        feature,
                        left,
                        right,
                        ..
                    } => {
                        if *feature >= artifact.n_features {
                            return Err(format!(
                                "tree {} node {} splits on feature {} but the model \
                                 expects {} features",
                                t, n, feature, artifact.n_features
                            ));
                        }
                        if *left >= tree.nodes.len() || *right >= tree.nodes.len() {
                            return Err(format!(
                                "tree {} node {} has a child index out of bounds",
                                t, n
                            ));
                        }
                        if *left <= n || *right <= n {
                            return Err(format!(
                                "tree {} node {} has a backward child index",
                                t, n
                            ));
                        }
                    }
                }
            }
        }

        Ok(Model { artifact })
    }

    /// Expected input dimensionality.
    pub fn n_features(&self) -> usize {
        self.artifact.n_features
    }

    /// The labels this model can predict.
    pub fn classes(&self) -> &[Label] {
        &self.artifact.classes
    }

    pub fn n_trees(&self) -> usize {
        self.artifact.trees.len()
    }

    /// Predicts one label per input row.
    ///
    /// Each row is routed through every tree; the final label is the
    /// majority vote over leaf classes, ties broken toward the lowest
    /// class id so predictions are deterministic. An empty matrix yields
    /// an empty vector.
    pub fn predict(&self, inputs: &Array2<f64>) -> Vec<Label> {
        let mut predictions = Vec::with_capacity(inputs.nrows());
        for row in inputs.rows() {
            let mut votes = vec![0usize; self.artifact.classes.len()];
            for tree in &self.artifact.trees {
                votes[tree.decide(row)] += 1;
            }
            let winner = votes
                .iter()
                .enumerate()
                .max_by(|(i, a), (j, b)| a.cmp(b).then(j.cmp(i)))
                .map(|(i, _)| i)
                .unwrap_or(0);
            predictions.push(self.artifact.classes[winner].clone());
        }
        predictions
    }
}
