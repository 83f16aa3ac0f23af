// Engine invocation building

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::domain::model::ResolvedSettings;
use crate::planner::graph::format_number;
use crate::planner::RenderPlan;

/// Full argument vector for one render
#[derive(Debug, Clone, PartialEq)]
pub struct EngineCommand {
    program: PathBuf,
    args: Vec<OsString>,
}

impl EngineCommand {
    /// Lay out inputs, graph, mapping and encoder options for `plan`
    pub fn build(
        program: &Path,
        plan: &RenderPlan,
        settings: &ResolvedSettings,
        audio: &Path,
        output: &Path,
    ) -> Self {
        let mut cmd = EngineCommand {
            program: program.to_path_buf(),
            args: Vec::new(),
        };

        cmd.push_all(&["-y", "-hide_banner", "-nostdin", "-loglevel", "error", "-stats"]);

        let fps = settings.fps.to_string();
        for image in &plan.layout.images {
            cmd.push_all(&["-loop", "1", "-framerate", fps.as_str(), "-t"]);
            cmd.push(format_number(image.duration));
            cmd.push("-i");
            cmd.push(&image.path);
        }

        cmd.push("-i");
        cmd.push(audio);

        if let Some(watermark) = &plan.watermark {
            cmd.push("-i");
            cmd.push(watermark);
        }

        cmd.push("-filter_complex");
        cmd.push(plan.filter_complex());

        cmd.push("-map");
        cmd.push(plan.output_label.to_string());
        cmd.push("-map");
        cmd.push(format!("{}:a", plan.layout.audio_index));

        cmd.push("-c:v");
        cmd.push(&settings.video_codec);
        cmd.push("-crf");
        cmd.push(settings.crf.to_string());
        cmd.push("-preset");
        cmd.push(settings.encoder_preset.as_str());
        cmd.push_all(&["-pix_fmt", "yuv420p", "-r", fps.as_str()]);
        cmd.push("-c:a");
        cmd.push(&settings.audio_codec);
        cmd.push("-b:a");
        cmd.push(&settings.audio_bitrate);

        cmd.push_all(&["-shortest", "-movflags", "+faststart"]);
        cmd.push(output);

        cmd
    }

    fn push(&mut self, arg: impl AsRef<std::ffi::OsStr>) {
        self.args.push(arg.as_ref().to_os_string());
    }

    fn push_all(&mut self, args: &[&str]) {
        for arg in args {
            self.push(arg);
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    pub fn args(&self) -> &[OsString] {
        &self.args
    }

    /// Process ready to spawn: stdin closed, stdout discarded, stderr piped
    pub fn to_command(&self) -> Command {
        let mut command = Command::new(&self.program);
        command
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());
        command
    }

    /// Shell-quoted command line, for `--dry-run`
    pub fn display(&self) -> String {
        std::iter::once(self.program.as_os_str())
            .chain(self.args.iter().map(|a| a.as_os_str()))
            .map(|a| shell_quote(&a.to_string_lossy()))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// POSIX single-quote `arg` unless it is made of shell-safe characters
pub fn shell_quote(arg: &str) -> String {
    let safe = !arg.is_empty()
        && arg
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./:=+,@%".contains(c));
    if safe {
        arg.to_string()
    } else {
        format!("'{}'", arg.replace('\'', "'\\''"))
    }
}
