//! WASI Environment Builder (C2, spec.md §4.2): assembles a preview1 WASI
//! context for one pipeline run — argv, env, stdio, and directory preopens.
//!
//! Grounded on the `WasiConfigurer`/`build_p1_ctx` pattern in the retrieval
//! pack's `sen-plugin-host` wasi-context source and the preopen plumbing in
//! `openskills`' `wasm_runner.rs`, both built on `wasmtime_wasi::preview1`.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use wasmtime_wasi::preview1::{self, WasiP1Ctx};
use wasmtime_wasi::{DirPerms, FilePerms, WasiCtxBuilder};

use crate::error::PipelineError;

/// Builds the `WasiP1Ctx` a guest instance runs inside.
///
/// File-kind inputs/outputs are not visible to a guest unless their parent
/// directory is preopened (spec.md §4.2 edge cases); [`mount_file_payloads`]
/// derives the minimal set of preopens needed for a given list of host
/// paths and should be called before [`WasiEnvBuilder::build`].
pub struct WasiEnvBuilder {
    inner: WasiCtxBuilder,
    inherit_stdio: bool,
}

impl WasiEnvBuilder {
    pub fn new() -> Self {
        WasiEnvBuilder {
            inner: WasiCtxBuilder::new(),
            inherit_stdio: false,
        }
    }

    pub fn args<I, S>(&mut self, args: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let args: Vec<String> = args.into_iter().map(|s| s.as_ref().to_string()).collect();
        self.inner.args(&args);
        self
    }

    pub fn env(&mut self, key: &str, value: &str) -> &mut Self {
        self.inner.env(key, value);
        self
    }

    /// Inherit the host process's stdio. Used by the CLI demo binary; the
    /// library default is to leave stdio unset (spec.md §4.2: a library
    /// caller should not have a module's stray prints land on its terminal
    /// unless it asked for that).
    pub fn inherit_stdio(&mut self, inherit: bool) -> &mut Self {
        self.inherit_stdio = inherit;
        self
    }

    /// Preopen `host_dir` for the guest under `guest_path`.
    pub fn preopen_dir(
        &mut self,
        host_dir: &Path,
        guest_path: &str,
        dir_perms: DirPerms,
        file_perms: FilePerms,
    ) -> Result<&mut Self, PipelineError> {
        self.inner
            .preopened_dir(host_dir, guest_path, dir_perms, file_perms)
            .map_err(PipelineError::ModuleCompileError)?;
        Ok(self)
    }

    pub fn build(&mut self) -> WasiP1Ctx {
        if self.inherit_stdio {
            self.inner.inherit_stdin().inherit_stdout().inherit_stderr();
        }
        self.inner.build_p1()
    }
}

impl Default for WasiEnvBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Where a host path landed inside the guest's view of the filesystem, after
/// [`mount_file_payloads`] preopened its parent directory.
#[derive(Debug, Clone)]
pub struct FileMount {
    pub guest_path: String,
}

/// Preopen the minimal set of parent directories covering every path in
/// `paths`, read-write, and return the corresponding guest-visible path for
/// each input path in order (spec.md §4.2: file kinds mount their parent
/// directory rather than the file itself, since the guest may need to read
/// sibling metadata or write alongside the declared file).
pub fn mount_file_payloads(
    builder: &mut WasiEnvBuilder,
    paths: &[&Path],
) -> Result<Vec<FileMount>, PipelineError> {
    let mut guest_dir_of: HashMap<PathBuf, String> = HashMap::new();
    let mut mounts = Vec::with_capacity(paths.len());

    for path in paths {
        let parent = path.parent().unwrap_or_else(|| Path::new("."));
        let parent = if parent.as_os_str().is_empty() {
            Path::new(".")
        } else {
            parent
        };
        let canonical_parent = parent.canonicalize()?;

        let guest_dir = match guest_dir_of.get(&canonical_parent) {
            Some(existing) => existing.clone(),
            None => {
                let guest_dir = format!("/mnt/{}", guest_dir_of.len());
                builder.preopen_dir(parent, &guest_dir, DirPerms::all(), FilePerms::all())?;
                guest_dir_of.insert(canonical_parent, guest_dir.clone());
                guest_dir
            }
        };

        let file_name = path
            .file_name()
            .ok_or_else(|| PipelineError::MalformedAddressUrl(path.display().to_string()))?;
        mounts.push(FileMount {
            guest_path: format!("{guest_dir}/{}", file_name.to_string_lossy()),
        });
    }

    Ok(mounts)
}

/// Re-exported so callers building a [`WasiEnvBuilder`] don't need a direct
/// `wasmtime-wasi` dependency for the common read-only/read-write cases.
pub fn readonly_perms() -> (DirPerms, FilePerms) {
    (DirPerms::READ, FilePerms::READ)
}

pub fn readwrite_perms() -> (DirPerms, FilePerms) {
    (DirPerms::all(), FilePerms::all())
}

/// Needed so `pipeline.rs` can hand the built context to `add_to_linker`.
pub fn add_to_linker<T>(
    linker: &mut wasmtime::Linker<T>,
    get_cx: impl Fn(&mut T) -> &mut WasiP1Ctx + Send + Sync + Copy + 'static,
) -> Result<(), PipelineError> {
    preview1::add_to_linker_sync(linker, get_cx).map_err(PipelineError::ModuleCompileError)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derives_one_preopen_per_distinct_parent_directory() {
        let dir_a = tempfile::tempdir().unwrap();
        let dir_b = tempfile::tempdir().unwrap();
        let in_path = dir_a.path().join("in.bin");
        let out_path = dir_b.path().join("out.bin");

        let mut builder = WasiEnvBuilder::new();
        let mounts = mount_file_payloads(&mut builder, &[&in_path, &out_path]).unwrap();

        assert_eq!(mounts.len(), 2);
        assert_ne!(mounts[0].guest_path, mounts[1].guest_path);
        assert!(mounts[0].guest_path.ends_with("in.bin"));
        assert!(mounts[1].guest_path.ends_with("out.bin"));
    }

    #[test]
    fn shares_one_preopen_for_paths_under_the_same_directory() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.bin");
        let b = dir.path().join("b.bin");

        let mut builder = WasiEnvBuilder::new();
        let mounts = mount_file_payloads(&mut builder, &[&a, &b]).unwrap();

        let guest_dir_of = |p: &str| p.rsplit_once('/').unwrap().0.to_string();
        assert_eq!(guest_dir_of(&mounts[0].guest_path), guest_dir_of(&mounts[1].guest_path));
    }

    #[test]
    fn dedup_key_is_canonicalized_so_symlinked_aliases_share_a_preopen() {
        let real_dir = tempfile::tempdir().unwrap();
        let alias_parent = real_dir.path().join("alias");
        std::os::unix::fs::symlink(real_dir.path(), &alias_parent).unwrap();

        let direct_path = real_dir.path().join("direct.bin");
        let aliased_path = alias_parent.join("aliased.bin");

        let mut builder = WasiEnvBuilder::new();
        let mounts = mount_file_payloads(&mut builder, &[&direct_path, &aliased_path]).unwrap();

        let guest_dir_of = |p: &str| p.rsplit_once('/').unwrap().0.to_string();
        assert_eq!(guest_dir_of(&mounts[0].guest_path), guest_dir_of(&mounts[1].guest_path));
    }
}
