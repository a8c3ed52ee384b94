//! Parametrized VQE and QAOA circuits.
//!
//! An [`Ansatz`] is a parametric [`Circuit`] template split into tagged
//! layers, together with one [`ParameterHandle`] per trainable angle.
//!
//! ```text
//! VQE, depth 2, 3 qubits:
//!
//! q0 ─[Ry(θ0)]─●──────[Ry(θ3)]─●─────
//! q1 ─[Ry(θ1)]─X──●───[Ry(θ4)]─X──●──
//! q2 ─[Ry(θ2)]────X───[Ry(θ5)]────X──
//! ```

use std::f64::consts::PI;
use std::ops::Range;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use hybridq_ir::{Angle, Circuit, QubitId};
use hybridq_problems::IsingProblem;

use crate::error::{VariationalError, VariationalResult};

/// What a layer of the ansatz does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayerKind {
    /// Fixed Hadamard on every qubit.
    Superposition,
    /// One trainable RY per qubit.
    Rotation,
    /// Fixed CX chain.
    Entangler,
    /// QAOA cost unitary, one shared γ.
    Cost,
    /// QAOA mixer, one shared β.
    Mixer,
}

/// A contiguous block of template instructions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    /// Role of the block.
    pub kind: LayerKind,
    /// Repetition the block belongs to.
    pub repetition: usize,
    /// Instruction indices in the template.
    pub instructions: Range<usize>,
}

/// Metadata for one trainable angle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterHandle {
    /// Position in the parameter vector.
    pub index: usize,
    /// Human-readable name, e.g. `theta_0_2` or `gamma_1`.
    pub name: String,
    /// Layer holding the angle.
    pub layer: usize,
    /// Qubit for per-qubit rotations.
    pub qubit: Option<usize>,
    /// Half-open range random initial values are drawn from.
    pub range: (f64, f64),
}

/// A parametric circuit with layer structure and parameter metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ansatz {
    template: Circuit,
    layers: Vec<Layer>,
    parameters: Vec<ParameterHandle>,
}

impl Ansatz {
    /// Name of the template circuit.
    pub fn name(&self) -> &str {
        self.template.name()
    }

    /// Register width.
    pub fn num_qubits(&self) -> usize {
        self.template.num_qubits()
    }

    /// Number of trainable parameters.
    pub fn num_parameters(&self) -> usize {
        self.parameters.len()
    }

    /// Parameter handles in vector order.
    pub fn parameters(&self) -> &[ParameterHandle] {
        &self.parameters
    }

    /// Layers in application order.
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// The unbound circuit.
    pub fn template(&self) -> &Circuit {
        &self.template
    }

    /// Bind a full parameter vector.
    pub fn bind(&self, params: &[f64]) -> VariationalResult<Circuit> {
        if params.len() != self.parameters.len() {
            return Err(VariationalError::ParameterCount {
                expected: self.parameters.len(),
                got: params.len(),
            });
        }
        Ok(self.template.bind(params)?)
    }

    /// Draw every parameter uniformly from its handle's range.
    pub fn sample_initial<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<f64> {
        self.parameters
            .iter()
            .map(|h| rng.gen_range(h.range.0..h.range.1))
            .collect()
    }
}

/// Records layers and handles while the template grows.
struct AnsatzBuilder {
    circuit: Circuit,
    layers: Vec<Layer>,
    parameters: Vec<ParameterHandle>,
}

impl AnsatzBuilder {
    fn new(name: &str, num_qubits: usize) -> VariationalResult<Self> {
        let width = u32::try_from(num_qubits).map_err(|_| {
            VariationalError::Config(format!("{num_qubits} qubits exceeds the register limit"))
        })?;
        Ok(Self {
            circuit: Circuit::with_size(name, width),
            layers: Vec::new(),
            parameters: Vec::new(),
        })
    }

    /// Run `body` and record the instructions it appended as one layer.
    fn layer(
        &mut self,
        kind: LayerKind,
        repetition: usize,
        body: impl FnOnce(&mut Self) -> VariationalResult<()>,
    ) -> VariationalResult<()> {
        let start = self.circuit.len();
        body(self)?;
        self.layers.push(Layer {
            kind,
            repetition,
            instructions: start..self.circuit.len(),
        });
        Ok(())
    }

    fn handle(&mut self, index: usize, name: String, qubit: Option<usize>, range: (f64, f64)) {
        self.parameters.push(ParameterHandle {
            index,
            name,
            layer: self.layers.len(),
            qubit,
            range,
        });
    }

    fn finish(mut self) -> Ansatz {
        self.parameters.sort_by_key(|h| h.index);
        Ansatz {
            template: self.circuit,
            layers: self.layers,
            parameters: self.parameters,
        }
    }
}

fn qubit(q: usize) -> QubitId {
    // Builders reject registers wider than u32 up front.
    QubitId(q as u32)
}

/// `depth` repetitions of {RY(θ) on every qubit, CX(q, q+1) chain}.
///
/// Parameter `l * num_qubits + q` is the rotation of qubit `q` in layer `l`.
pub fn build_vqe(num_qubits: usize, depth: usize) -> VariationalResult<Ansatz> {
    let mut b = AnsatzBuilder::new("vqe_ry_cx", num_qubits)?;

    for l in 0..depth {
        b.layer(LayerKind::Rotation, l, |b| {
            for q in 0..num_qubits {
                let index = l * num_qubits + q;
                b.handle(index, format!("theta_{l}_{q}"), Some(q), (0.0, 2.0 * PI));
                b.circuit.ry(Angle::param(index), qubit(q))?;
            }
            Ok(())
        })?;
        b.layer(LayerKind::Entangler, l, |b| {
            for q in 1..num_qubits {
                b.circuit.cx(qubit(q - 1), qubit(q))?;
            }
            Ok(())
        })?;
    }

    let ansatz = b.finish();
    debug!(
        num_qubits,
        depth,
        parameters = ansatz.num_parameters(),
        "built VQE ansatz"
    );
    Ok(ansatz)
}

/// Superposition followed by `p` rounds of cost(γℓ) and mixer(βℓ).
///
/// The parameter vector is `[γ0, ..., γ(p-1), β0, ..., β(p-1)]`.
pub fn build_qaoa(problem: &IsingProblem, p: usize) -> VariationalResult<Ansatz> {
    let n = problem.num_qubits();
    let mut b = AnsatzBuilder::new("qaoa", n)?;

    b.layer(LayerKind::Superposition, 0, |b| {
        for q in 0..n {
            b.circuit.h(qubit(q))?;
        }
        Ok(())
    })?;

    for l in 0..p {
        let gamma = l;
        let beta = p + l;

        b.handle(gamma, format!("gamma_{l}"), None, (0.0, PI));
        b.layer(LayerKind::Cost, l, |b| {
            for (i, j, w) in problem.interactions() {
                b.circuit.cx(qubit(i), qubit(j))?;
                b.circuit.rz(Angle::scaled(gamma, 2.0 * w), qubit(j))?;
                b.circuit.cx(qubit(i), qubit(j))?;
            }
            for (i, h) in problem.linear_terms() {
                b.circuit.rz(Angle::scaled(gamma, 2.0 * h), qubit(i))?;
            }
            Ok(())
        })?;

        b.handle(beta, format!("beta_{l}"), None, (0.0, PI / 2.0));
        b.layer(LayerKind::Mixer, l, |b| {
            for q in 0..n {
                b.circuit.rx(Angle::scaled(beta, 2.0), qubit(q))?;
            }
            Ok(())
        })?;
    }

    let ansatz = b.finish();
    debug!(
        num_qubits = n,
        p,
        gates = ansatz.template().len(),
        "built QAOA ansatz"
    );
    Ok(ansatz)
}

/// The bound QAOA circuit for explicit `gammas` and `betas`.
pub fn bind_qaoa(
    problem: &IsingProblem,
    gammas: &[f64],
    betas: &[f64],
) -> VariationalResult<Circuit> {
    if gammas.len() != betas.len() {
        return Err(VariationalError::ParameterCount {
            expected: 2 * gammas.len(),
            got: gammas.len() + betas.len(),
        });
    }
    let ansatz = build_qaoa(problem, gammas.len())?;
    let params: Vec<f64> = gammas.iter().chain(betas).copied().collect();
    ansatz.bind(&params)
}
