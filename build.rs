//! Build script: records the git commit for `multivac --version`.
//!
//! Dev builds get `VERGEN_GIT_SHA`; builds with the `release` feature carry
//! the plain package version only.

fn main() {
    #[cfg(not(feature = "release"))]
    emit_git_sha();
}

#[cfg(not(feature = "release"))]
fn emit_git_sha() {
    use vergen_gitcl::{Emitter, GitclBuilder};

    let emitted = GitclBuilder::default()
        .sha(true)
        .build()
        .map_err(|e| e.to_string())
        .and_then(|git| {
            Emitter::default()
                .add_instructions(&git)
                .and_then(|emitter| emitter.emit())
                .map_err(|e| e.to_string())
        });

    if let Err(e) = emitted {
        // Outside a git checkout; cli::version falls back to the package version.
        println!("cargo:warning=Failed to get git info: {}", e);
    }
}
