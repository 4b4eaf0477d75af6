use anyhow::{Context, Result};
use git2::{Repository, Signature, Time};
use std::path::Path;
use std::sync::Mutex;

/// Git operations for version-controlling the task data file.
///
/// All operations are no-ops when the data file does not live inside a git
/// work tree, so callers never need to branch on that themselves.
pub struct GitOps {
    repo: Option<Mutex<Repository>>,
}

impl GitOps {
    /// Detect the repository (if any) containing the data file.
    pub fn new(file_path: &Path) -> Self {
        let dir = if file_path.is_file() {
            file_path.parent().unwrap_or(file_path).to_path_buf()
        } else {
            file_path.to_path_buf()
        };

        let repo = Repository::discover(&dir).ok().map(Mutex::new);
        Self { repo }
    }

    /// Whether the data file is under git version control
    pub fn is_git_managed(&self) -> bool {
        self.repo.is_some()
    }

    /// Fast-forward the current branch from `origin`.
    ///
    /// A merge that is not a fast-forward is refused; resolving diverged
    /// histories of the data file is the user's call.
    pub fn pull(&self) -> Result<()> {
        let repo = match &self.repo {
            Some(r) => r.lock().unwrap(),
            None => return Ok(()),
        };

        let head = repo.head().context("Failed to get HEAD")?;
        let branch_name = head
            .shorthand()
            .context("Failed to get branch name")?
            .to_string();

        let mut remote = repo
            .find_remote("origin")
            .context("Failed to find remote 'origin'")?;
        remote
            .fetch(&[&branch_name], None, None)
            .context("Failed to fetch from origin")?;

        let fetch_head = repo.find_reference("FETCH_HEAD")?;
        let fetch_commit = repo.reference_to_annotated_commit(&fetch_head)?;
        let (analysis, _) = repo.merge_analysis(&[&fetch_commit])?;

        if analysis.is_up_to_date() {
            return Ok(());
        }

        if analysis.is_fast_forward() {
            let refname = format!("refs/heads/{}", branch_name);
            let mut reference = repo.find_reference(&refname)?;
            reference.set_target(fetch_commit.id(), "Fast-forward")?;
            repo.set_head(&refname)?;
            repo.checkout_head(Some(git2::build::CheckoutBuilder::default().force()))?;
            return Ok(());
        }

        Err(anyhow::anyhow!(
            "Remote history has diverged; merge the task file manually"
        ))
    }

    /// Stage the data file and commit it with `message`.
    ///
    /// Skips the commit entirely when the resulting tree matches HEAD, so
    /// repeated saves of identical content do not pile up empty commits.
    pub fn commit(&self, file_path: &Path, message: &str) -> Result<()> {
        let repo = match &self.repo {
            Some(r) => r.lock().unwrap(),
            None => return Ok(()),
        };

        let workdir = repo
            .workdir()
            .context("Repository has no working directory")?;
        let relative_path = file_path
            .strip_prefix(workdir)
            .context("Task file is not inside the repository")?;

        let mut index = repo.index()?;
        index.add_path(relative_path)?;
        index.write()?;

        let tree_id = index.write_tree()?;

        let parent_commit = match repo.head() {
            Ok(head) => {
                let oid = head.target().context("HEAD has no target")?;
                Some(repo.find_commit(oid)?)
            }
            Err(_) => None, // Initial commit
        };

        if let Some(parent) = &parent_commit
            && parent.tree_id() == tree_id
        {
            return Ok(());
        }

        let tree = repo.find_tree(tree_id)?;
        let signature = Self::signature(&repo)?;
        let parents: Vec<_> = parent_commit.iter().collect();

        repo.commit(
            Some("HEAD"),
            &signature,
            &signature,
            message,
            &tree,
            &parents,
        )?;

        Ok(())
    }

    /// Push the current branch to `origin`.
    pub fn push(&self) -> Result<()> {
        let repo = match &self.repo {
            Some(r) => r.lock().unwrap(),
            None => return Ok(()),
        };

        let head = repo.head().context("Failed to get HEAD")?;
        let branch_name = head
            .shorthand()
            .context("Failed to get branch name")?
            .to_string();

        let mut remote = repo
            .find_remote("origin")
            .context("Failed to find remote 'origin'")?;
        let refspec = format!("refs/heads/{}", branch_name);
        remote.push(&[&refspec], None)?;

        Ok(())
    }

    fn signature(repo: &Repository) -> Result<Signature<'_>> {
        let config = repo.config()?;
        let name = config
            .get_string("user.name")
            .unwrap_or_else(|_| "Todo MCP Server".to_string());
        let email = config
            .get_string("user.email")
            .unwrap_or_else(|_| "todo-mcp@localhost".to_string());

        match Signature::now(&name, &email) {
            Ok(sig) => Ok(sig),
            Err(_) => {
                // Some CI sandboxes refuse the clock; fall back to a fixed time
                let time = Time::new(1_700_000_000, 0);
                Signature::new(&name, &email, &time).context("Failed to create git signature")
            }
        }
    }
}
