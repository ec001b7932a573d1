//! GitHub platform service implementation

use crate::error::{Error, Result};
use crate::platform::PlatformService;
use crate::types::{
    CheckAnnotation, CheckRun, CheckRunOutput, CombinedStatus, CommitStatus, MergeMethod,
    MergeResult, MergeableState, PrComment, PrListing, PullRequestCandidate, RepoRef,
};
use async_trait::async_trait;
use chrono::Utc;
use octocrab::Octocrab;
use reqwest::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;

// Raw response types for the status endpoints octocrab does not cover well

#[derive(Deserialize)]
struct RawCombinedStatus {
    state: String,
    total_count: u64,
    #[serde(default)]
    statuses: Vec<RawStatus>,
}

#[derive(Deserialize)]
struct RawStatus {
    state: String,
    context: String,
    description: Option<String>,
}

#[derive(Deserialize)]
struct RawCheckRuns {
    #[serde(default)]
    total_count: u64,
    #[serde(default)]
    check_runs: Vec<RawCheckRun>,
}

const CHECK_RUNS_PER_PAGE: usize = 100;

#[derive(Deserialize)]
struct RawCheckRun {
    id: u64,
    name: String,
    status: String,
    conclusion: Option<String>,
    output: Option<RawCheckRunOutput>,
}

#[derive(Deserialize)]
struct RawCheckRunOutput {
    title: Option<String>,
    summary: Option<String>,
}

#[derive(Deserialize)]
struct RawAnnotation {
    #[serde(default)]
    message: String,
}

/// GitHub service using octocrab
pub struct GitHubService {
    client: Octocrab,
    /// Token for raw HTTP requests (CI status checking)
    token: String,
    /// HTTP client for raw requests (CI status checking)
    http_client: Client,
    /// API base URL for raw requests, without trailing slash
    api_base: String,
}

impl GitHubService {
    /// Create a new GitHub service
    ///
    /// `host` selects a GitHub Enterprise instance; `None` means github.com.
    pub fn new(token: &str, host: Option<&str>) -> Result<Self> {
        let api_base = host.map_or_else(
            || "https://api.github.com".to_string(),
            |h| format!("https://{h}/api/v3"),
        );
        Self::with_api_base(token, &api_base)
    }

    /// Create a service against an explicit API base URL
    pub fn with_api_base(token: &str, api_base: &str) -> Result<Self> {
        let api_base = api_base.trim_end_matches('/').to_string();

        let client = Octocrab::builder()
            .personal_token(token.to_string())
            .base_uri(&api_base)
            .map_err(|e| Error::GitHubApi(e.to_string()))?
            .build()
            .map_err(|e| Error::GitHubApi(e.to_string()))?;

        let http_client = Client::builder()
            .user_agent("pr-triage")
            .build()
            .map_err(|e| Error::GitHubApi(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            token: token.to_string(),
            http_client,
            api_base,
        })
    }

    /// Login of the authenticated user
    pub async fn current_login(&self) -> Result<String> {
        let user = self.client.current().user().await?;
        Ok(user.login)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, what: &str) -> Result<T> {
        let url = format!("{}{path}", self.api_base);

        let response = self
            .http_client
            .get(&url)
            .header("Authorization", format!("Bearer {}", self.token))
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28")
            .send()
            .await
            .map_err(|e| Error::GitHubApi(format!("Failed to fetch {what}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::GitHubApi(format!("{what} request returned {status}")));
        }

        response
            .json()
            .await
            .map_err(|e| Error::GitHubApi(format!("Failed to parse {what}: {e}")))
    }
}

/// Extract `owner/name` from an API repository URL (`.../repos/{owner}/{name}`)
fn repo_from_api_url(url: &url::Url) -> Option<RepoRef> {
    let segments: Vec<&str> = url.path_segments()?.filter(|s| !s.is_empty()).collect();
    match segments.as_slice() {
        [.., "repos", owner, name] => Some(RepoRef::new(*owner, *name)),
        _ => None,
    }
}

fn candidate_from_octocrab(
    repo: &RepoRef,
    pr: &octocrab::models::pulls::PullRequest,
) -> Result<PullRequestCandidate> {
    let base_repo = pr
        .base
        .repo
        .as_ref()
        .ok_or_else(|| Error::GitHubApi(format!("PR {repo}#{} has no base repository", pr.number)))?;
    let base_clone_url = base_repo
        .clone_url
        .as_ref()
        .map(ToString::to_string)
        .ok_or_else(|| Error::GitHubApi(format!("{repo} has no clone URL")))?;
    let head_repo = pr.head.repo.as_ref();

    Ok(PullRequestCandidate {
        repository: repo.clone(),
        number: pr.number,
        title: pr.title.clone().unwrap_or_default(),
        html_url: pr
            .html_url
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_default(),
        author: pr
            .user
            .as_ref()
            .map(|u| u.login.clone())
            .unwrap_or_default(),
        head_ref: pr.head.ref_field.clone(),
        base_ref: pr.base.ref_field.clone(),
        head_sha: pr.head.sha.clone(),
        head_repo_id: head_repo.map(|r| r.id.0),
        base_repo_id: base_repo.id.0,
        head_clone_url: head_repo.and_then(|r| r.clone_url.as_ref().map(ToString::to_string)),
        base_clone_url,
        mergeable_state: MergeableState::from(pr.mergeable),
        is_draft: pr.draft.unwrap_or(false),
        commit_count: pr.commits.unwrap_or(0),
        // A missing timestamp is treated as "just opened" so the age gate defers it
        created_at: pr.created_at.unwrap_or_else(Utc::now),
    })
}

#[async_trait]
impl PlatformService for GitHubService {
    async fn search_open_prs(&self, query: &str) -> Result<Vec<PrListing>> {
        debug!(query, "searching open PRs");
        let page = self
            .client
            .search()
            .issues_and_pull_requests(query)
            .per_page(100)
            .send()
            .await?;
        let issues = self.client.all_pages(page).await?;

        let listings: Vec<PrListing> = issues
            .into_iter()
            .filter(|issue| issue.pull_request.is_some())
            .filter_map(|issue| {
                let Some(repository) = repo_from_api_url(&issue.repository_url) else {
                    debug!(url = %issue.repository_url, "skipping search hit with unparseable repository URL");
                    return None;
                };
                Some(PrListing {
                    repository,
                    number: issue.number,
                    title: issue.title,
                    html_url: issue.html_url.to_string(),
                })
            })
            .collect();
        debug!(count = listings.len(), "found open PRs");
        Ok(listings)
    }

    async fn get_candidate(&self, repo: &RepoRef, number: u64) -> Result<PullRequestCandidate> {
        debug!(%repo, number, "getting PR snapshot");
        let pr = self.client.pulls(&repo.owner, &repo.name).get(number).await?;
        let candidate = candidate_from_octocrab(repo, &pr)?;
        debug!(%repo, number, state = ?candidate.mergeable_state, "got PR snapshot");
        Ok(candidate)
    }

    async fn get_combined_status(&self, repo: &RepoRef, sha: &str) -> Result<CombinedStatus> {
        let raw: RawCombinedStatus = self
            .get_json(
                &format!("/repos/{}/{}/commits/{sha}/status", repo.owner, repo.name),
                "commit status",
            )
            .await?;

        debug!(state = %raw.state, count = raw.total_count, "combined status result");
        Ok(CombinedStatus {
            state: raw.state,
            total_count: raw.total_count,
            statuses: raw
                .statuses
                .into_iter()
                .map(|s| CommitStatus {
                    state: s.state,
                    context: s.context,
                    description: s.description,
                })
                .collect(),
        })
    }

    async fn get_check_runs(&self, repo: &RepoRef, sha: &str) -> Result<Vec<CheckRun>> {
        let mut runs: Vec<RawCheckRun> = Vec::new();
        let mut page = 1;
        loop {
            let raw: RawCheckRuns = self
                .get_json(
                    &format!(
                        "/repos/{}/{}/commits/{sha}/check-runs?per_page={CHECK_RUNS_PER_PAGE}&page={page}",
                        repo.owner, repo.name
                    ),
                    "check runs",
                )
                .await?;

            let fetched = raw.check_runs.len();
            runs.extend(raw.check_runs);
            if fetched < CHECK_RUNS_PER_PAGE || runs.len() as u64 >= raw.total_count {
                break;
            }
            page += 1;
        }

        debug!(count = runs.len(), "check runs result");
        Ok(runs
            .into_iter()
            .map(|r| CheckRun {
                id: r.id,
                name: r.name,
                status: r.status,
                conclusion: r.conclusion,
                output: r.output.map(|o| CheckRunOutput {
                    title: o.title,
                    summary: o.summary,
                }),
            })
            .collect())
    }

    async fn get_annotations(
        &self,
        repo: &RepoRef,
        check_run_id: u64,
    ) -> Result<Vec<CheckAnnotation>> {
        let raw: Vec<RawAnnotation> = self
            .get_json(
                &format!(
                    "/repos/{}/{}/check-runs/{check_run_id}/annotations",
                    repo.owner, repo.name
                ),
                "check run annotations",
            )
            .await?;

        Ok(raw
            .into_iter()
            .filter(|a| !a.message.is_empty())
            .map(|a| CheckAnnotation { message: a.message })
            .collect())
    }

    async fn merge_pr(
        &self,
        repo: &RepoRef,
        number: u64,
        method: MergeMethod,
    ) -> Result<MergeResult> {
        debug!(%repo, number, %method, "merging PR");

        let octocrab_method = match method {
            MergeMethod::Squash => octocrab::params::pulls::MergeMethod::Squash,
            MergeMethod::Merge => octocrab::params::pulls::MergeMethod::Merge,
            MergeMethod::Rebase => octocrab::params::pulls::MergeMethod::Rebase,
        };

        let result = self
            .client
            .pulls(&repo.owner, &repo.name)
            .merge(number)
            .method(octocrab_method)
            .send()
            .await
            .map_err(|e| Error::GitHubApi(format!("Merge failed: {e}")))?;

        let merge_result = MergeResult {
            merged: result.merged,
            sha: result.sha,
            message: result.message,
        };

        debug!(
            %repo,
            number,
            merged = merge_result.merged,
            sha = ?merge_result.sha,
            "merge complete"
        );
        Ok(merge_result)
    }

    async fn add_label(&self, repo: &RepoRef, number: u64, label: &str) -> Result<()> {
        debug!(%repo, number, label, "adding label");
        self.client
            .issues(&repo.owner, &repo.name)
            .add_labels(number, &[label.to_string()])
            .await?;
        Ok(())
    }

    async fn list_pr_comments(&self, repo: &RepoRef, number: u64) -> Result<Vec<PrComment>> {
        debug!(%repo, number, "listing PR comments");
        let page = self
            .client
            .issues(&repo.owner, &repo.name)
            .list_comments(number)
            .per_page(100)
            .send()
            .await?;
        let comments = self.client.all_pages(page).await?;

        let result: Vec<PrComment> = comments
            .into_iter()
            .map(|c| PrComment {
                id: c.id.0,
                body: c.body.unwrap_or_default(),
            })
            .collect();
        debug!(%repo, number, count = result.len(), "listed PR comments");
        Ok(result)
    }

    async fn create_pr_comment(&self, repo: &RepoRef, number: u64, body: &str) -> Result<()> {
        debug!(%repo, number, "creating PR comment");
        self.client
            .issues(&repo.owner, &repo.name)
            .create_comment(number, body)
            .await?;
        debug!(%repo, number, "created PR comment");
        Ok(())
    }
}
