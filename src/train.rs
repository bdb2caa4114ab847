//! External trainer invocation and model file naming.
//!
//! Training runs out of process: the gatherer exports a problem file, a
//! [`Trainer`] runs LIBLINEAR or RankLib on it, and the resulting model file
//! is loaded back through [`crate::models`].
//!
//! ```text
//! ExampleGatherer ──export──▶ train.dat ──Trainer::train──▶ models/model_1-3_AF_1.00000000
//! ```

use crate::learn::{feature_list_repr, Fixed};
use crate::{Error, Result};
use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Directory LIBLINEAR binaries are looked up in by default.
pub const DEFAULT_LIBLINEAR_DIR: &str = "libs/liblinear-2.0";

/// RankLib jar used by default.
pub const DEFAULT_RANKLIB_JAR: &str = "RankLib.jar";

/// An external training program.
pub trait Trainer {
    /// Short name for logs and errors.
    fn name(&self) -> &str;

    /// The command that trains on `problem` and writes `model`.
    fn command(&self, problem: &Path, model: &Path) -> Command;

    /// Run the trainer and wait for it.
    ///
    /// A non-zero exit status is an [`Error::Trainer`] carrying the trainer's
    /// stderr.
    fn train(&self, problem: &Path, model: &Path) -> Result<()> {
        let mut cmd = self.command(problem, model);
        log::info!("training {} model: {}", self.name(), command_line(&cmd));
        run(self.name(), &mut cmd)?;
        log::info!("{} model written to {}", self.name(), model.display());
        Ok(())
    }
}

/// Shell-like rendering of a command, for logs and dry runs.
pub fn command_line(cmd: &Command) -> String {
    let mut line = cmd.get_program().to_string_lossy().into_owned();
    for arg in cmd.get_args() {
        line.push(' ');
        line.push_str(&arg.to_string_lossy());
    }
    line
}

fn run(name: &str, cmd: &mut Command) -> Result<()> {
    let output = cmd
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| Error::trainer(format!("failed to start {}: {}: {}", name, command_line(cmd), e)))?
        .wait_with_output()
        .map_err(|e| Error::trainer(format!("failed to wait for {}: {}", name, e)))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(Error::trainer(format!(
            "{} exited with code {:?}: {}",
            name,
            output.status.code(),
            stderr.trim()
        )));
    }
    log::debug!("{} output: {}", name, String::from_utf8_lossy(&output.stdout).trim());
    Ok(())
}

/// LIBLINEAR's `train` binary.
#[derive(Debug, Clone, PartialEq)]
pub struct LibLinearTrainer {
    /// Directory holding the `train` binary
    pub base_dir: PathBuf,
    /// Solver type (`-s`)
    pub solver: u32,
    /// Cost parameter (`-c`)
    pub c: f64,
}

impl LibLinearTrainer {
    /// Trainer using the default LIBLINEAR directory.
    #[must_use]
    pub fn new(solver: u32, c: f64) -> Self {
        Self {
            base_dir: PathBuf::from(DEFAULT_LIBLINEAR_DIR),
            solver,
            c,
        }
    }

    /// Look for the `train` binary in `dir`.
    #[must_use]
    pub fn with_base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_dir = dir.into();
        self
    }
}

impl Trainer for LibLinearTrainer {
    fn name(&self) -> &str {
        "liblinear"
    }

    fn command(&self, problem: &Path, model: &Path) -> Command {
        let mut cmd = Command::new(self.base_dir.join("train"));
        cmd.arg("-s")
            .arg(self.solver.to_string())
            .arg("-c")
            .arg(format!("{:.8}", self.c))
            .arg(problem)
            .arg(model);
        cmd
    }
}

/// RankLib, run as `java -jar RankLib.jar`.
#[derive(Debug, Clone, PartialEq)]
pub struct RankLibTrainer {
    /// Java executable
    pub java: String,
    /// RankLib jar
    pub jar: PathBuf,
    /// Ranker id (`-ranker`); 6 is LambdaMART, 4 Coordinate Ascent
    pub ranker: u32,
    /// Metric optimized on training data (`-metric2t`)
    pub metric: String,
    /// Feature list file (`-feature`), one index per line
    pub feature_file: Option<PathBuf>,
    /// Validation ranking file (`-validate`)
    pub validate: Option<PathBuf>,
}

impl Default for RankLibTrainer {
    fn default() -> Self {
        Self {
            java: "java".to_string(),
            jar: PathBuf::from(DEFAULT_RANKLIB_JAR),
            ranker: 6,
            metric: "NDCG@15".to_string(),
            feature_file: None,
            validate: None,
        }
    }
}

impl Trainer for RankLibTrainer {
    fn name(&self) -> &str {
        "ranklib"
    }

    fn command(&self, problem: &Path, model: &Path) -> Command {
        let mut cmd = Command::new(&self.java);
        cmd.arg("-jar").arg(&self.jar);
        if let Some(f) = &self.feature_file {
            cmd.arg("-feature").arg(f);
        }
        cmd.arg("-ranker")
            .arg(self.ranker.to_string())
            .arg("-metric2t")
            .arg(&self.metric)
            .arg("-train")
            .arg(problem);
        if let Some(v) = &self.validate {
            cmd.arg("-validate").arg(v);
        }
        cmd.arg("-save").arg(model);
        cmd
    }
}

/// Write a RankLib feature list file, one 1-based index per line.
pub fn write_feature_list_file(path: impl AsRef<Path>, features: &[usize]) -> Result<()> {
    let path = path.as_ref();
    let mut file = fs::File::create(path)?;
    for f in features {
        writeln!(file, "{}", f)?;
    }
    log::debug!("wrote feature list {} to {}", feature_list_repr(features), path.display());
    Ok(())
}

/// Model family, with the hyper-parameters that appear in its file name.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ModelKind {
    /// Entity filter (SVM with class weights and RBF gamma)
    EntityFilter {
        /// Positive class weight
        w_pos: f64,
        /// Negative class weight
        w_neg: f64,
        /// Kernel gamma
        gamma: f64,
        /// Cost
        c: f64,
    },
    /// Annotation regressor
    AnnotationRegressor {
        /// Cost
        c: f64,
    },
    /// Link-back binding regressor
    LinkBack {
        /// Cost
        c: f64,
    },
    /// RankLib ranker
    RankLib,
}

impl ModelKind {
    /// Two-letter tag used in file names.
    #[must_use]
    pub fn tag(&self) -> &'static str {
        match self {
            ModelKind::EntityFilter { .. } => "EF",
            ModelKind::AnnotationRegressor { .. } => "AF",
            ModelKind::LinkBack { .. } => "LB",
            ModelKind::RankLib => "RL",
        }
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            ModelKind::EntityFilter { w_pos, w_neg, gamma, c } => {
                write!(
                    f,
                    "EF_{}_{}_{}_{}",
                    Fixed(w_pos, 5),
                    Fixed(w_neg, 5),
                    Fixed(gamma, 8),
                    Fixed(c, 8)
                )
            }
            ModelKind::AnnotationRegressor { c } => write!(f, "AF_{}", Fixed(c, 8)),
            // C appears at two precisions; existing model directories use this layout
            ModelKind::LinkBack { c } => write!(f, "LB_{}_{}", Fixed(c, 3), Fixed(c, 8)),
            ModelKind::RankLib => write!(f, "RL"),
        }
    }
}

/// Base path of a model file: `models/model_<features>_<kind>`.
#[must_use]
pub fn model_file_base(features: &[usize], kind: ModelKind) -> String {
    format!("models/model_{}_{}", feature_list_repr(features), kind)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(cmd: &Command) -> Vec<String> {
        cmd.get_args().map(|a| a.to_string_lossy().into_owned()).collect()
    }

    #[test]
    fn liblinear_command_line() {
        let t = LibLinearTrainer::new(12, 0.5).with_base_dir("/opt/liblinear");
        let cmd = t.command(Path::new("train.dat"), Path::new("model"));
        assert_eq!(cmd.get_program(), Path::new("/opt/liblinear/train").as_os_str());
        assert_eq!(args(&cmd), vec!["-s", "12", "-c", "0.50000000", "train.dat", "model"]);
    }

    #[test]
    fn ranklib_command_line() {
        let t = RankLibTrainer {
            feature_file: Some(PathBuf::from("/tmp/feature_list_1-3")),
            validate: Some(PathBuf::from("devel.dat")),
            ..RankLibTrainer::default()
        };
        let cmd = t.command(Path::new("train.dat"), Path::new("m.model"));
        assert_eq!(cmd.get_program(), "java");
        assert_eq!(
            args(&cmd),
            vec![
                "-jar",
                "RankLib.jar",
                "-feature",
                "/tmp/feature_list_1-3",
                "-ranker",
                "6",
                "-metric2t",
                "NDCG@15",
                "-train",
                "train.dat",
                "-validate",
                "devel.dat",
                "-save",
                "m.model"
            ]
        );
    }

    #[test]
    fn ranklib_optional_flags_omitted() {
        let cmd = RankLibTrainer::default().command(Path::new("t"), Path::new("m"));
        let a = args(&cmd);
        assert!(!a.contains(&"-feature".to_string()));
        assert!(!a.contains(&"-validate".to_string()));
    }

    #[test]
    fn missing_trainer_binary() {
        let t = LibLinearTrainer::new(0, 1.0).with_base_dir("/nonexistent/annolink/liblinear");
        let err = t.train(Path::new("p"), Path::new("m")).unwrap_err();
        assert!(matches!(err, Error::Trainer(_)));
    }

    #[test]
    fn model_file_names() {
        assert_eq!(
            model_file_base(&[3, 1, 2, 5], ModelKind::AnnotationRegressor { c: 0.1 }),
            "models/model_1-3,5_AF_0.10000000"
        );
        assert_eq!(
            model_file_base(
                &[1],
                ModelKind::EntityFilter { w_pos: 2.0, w_neg: 1.0, gamma: 0.03, c: 1.0 }
            ),
            "models/model_1_EF_2.00000_1.00000_0.03000000_1.00000000"
        );
        assert_eq!(
            model_file_base(&[1, 2], ModelKind::LinkBack { c: 0.5 }),
            "models/model_1-2_LB_0.500_0.50000000"
        );
        assert_eq!(model_file_base(&[4, 5, 6], ModelKind::RankLib), "models/model_4-6_RL");
    }

    #[test]
    fn model_file_names_round_ties_up() {
        assert_eq!(
            model_file_base(&[1], ModelKind::LinkBack { c: 0.0625 }),
            "models/model_1_LB_0.063_0.06250000"
        );
    }

    #[test]
    fn feature_list_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("features");
        write_feature_list_file(&path, &[1, 2, 7]).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "1\n2\n7\n");
    }
}
