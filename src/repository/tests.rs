//! Tests for repository module.

#[cfg(test)]
mod tests {
    use crate::repository::{normalize_extensions, CrawlOptions, TreeCrawler};
    use crate::testing::FakeSourceHost;

    const REPO: &str = "octocat/notebooks";

    fn py_only() -> std::collections::HashSet<String> {
        normalize_extensions(Some(&["py".to_string()]))
    }

    /// Ten matching files spread over three directories, at most three levels deep.
    fn ten_file_host() -> FakeSourceHost {
        FakeSourceHost::new("octocat")
            .with_repo("notebooks")
            .with_file(REPO, "a/one.py", "1")
            .with_file(REPO, "a/two.py", "2")
            .with_file(REPO, "a/three.py", "3")
            .with_file(REPO, "b/c/four.py", "4")
            .with_file(REPO, "b/c/five.py", "5")
            .with_file(REPO, "b/c/six.py", "6")
            .with_file(REPO, "b/c/d/seven.py", "7")
            .with_file(REPO, "e/eight.py", "8")
            .with_file(REPO, "e/nine.py", "9")
            .with_file(REPO, "e/ten.py", "10")
    }

    #[tokio::test]
    async fn test_crawl_stops_at_max_files() {
        let host = ten_file_host();
        let snapshot = TreeCrawler::new(&host)
            .crawl(REPO, &CrawlOptions::new(py_only(), 5))
            .await
            .unwrap();

        assert_eq!(snapshot.files.len(), 5);
        assert!(snapshot.file_limit_reached);
        assert_eq!(snapshot.counts_by_category.get("PY"), Some(&5));
    }

    #[tokio::test]
    async fn test_crawl_keeps_listing_order() {
        let host = ten_file_host();
        let snapshot = TreeCrawler::new(&host)
            .crawl(REPO, &CrawlOptions::new(py_only(), 5))
            .await
            .unwrap();

        let paths: Vec<&str> = snapshot.files.iter().map(|f| f.path.as_str()).collect();
        assert_eq!(
            paths,
            vec![
                "a/one.py",
                "a/two.py",
                "a/three.py",
                "b/c/four.py",
                "b/c/five.py"
            ]
        );
    }

    #[tokio::test]
    async fn test_crawl_exhausting_tree_is_not_a_limit_hit() {
        let host = ten_file_host();
        let snapshot = TreeCrawler::new(&host)
            .crawl(REPO, &CrawlOptions::new(py_only(), 10))
            .await
            .unwrap();

        assert_eq!(snapshot.files.len(), 10);
        assert!(!snapshot.file_limit_reached);
        assert_eq!(snapshot.traversal_depth_reached, 3);
    }

    #[tokio::test]
    async fn test_crawl_respects_max_depth() {
        let host = ten_file_host();
        let options = CrawlOptions::new(py_only(), 50).with_max_depth(2);
        let snapshot = TreeCrawler::new(&host).crawl(REPO, &options).await.unwrap();

        assert!(snapshot.files.iter().all(|f| f.depth <= 2));
        assert!(!snapshot.files.iter().any(|f| f.path == "b/c/d/seven.py"));
        assert_eq!(snapshot.files.len(), 9);
        // The too-deep directory is never listed.
        assert!(!host.listed_paths().contains(&"b/c/d".to_string()));
    }

    #[tokio::test]
    async fn test_crawl_depth_zero_reads_only_root() {
        let host = ten_file_host().with_file(REPO, "setup.py", "root");
        let options = CrawlOptions::new(py_only(), 50).with_max_depth(0);
        let snapshot = TreeCrawler::new(&host).crawl(REPO, &options).await.unwrap();

        assert_eq!(snapshot.files.len(), 1);
        assert_eq!(snapshot.files[0].path, "setup.py");
        assert_eq!(snapshot.files[0].depth, 0);
    }

    #[tokio::test]
    async fn test_readme_included_regardless_of_extension() {
        let host = FakeSourceHost::new("octocat")
            .with_repo("notebooks")
            .with_file(REPO, "README.rst", "Read me")
            .with_file(REPO, "docs/ReadMe", "Nested")
            .with_file(REPO, "notes.rst", "skipped")
            .with_file(REPO, "main.py", "print()");

        let snapshot = TreeCrawler::new(&host)
            .crawl(REPO, &CrawlOptions::new(py_only(), 50))
            .await
            .unwrap();

        let paths: Vec<&str> = snapshot.files.iter().map(|f| f.path.as_str()).collect();
        assert_eq!(paths, vec!["README.rst", "docs/ReadMe", "main.py"]);
        assert_eq!(snapshot.counts_by_category.get("README"), Some(&2));
        assert_eq!(snapshot.counts_by_category.get("PY"), Some(&1));
    }

    #[tokio::test]
    async fn test_failing_subtree_contributes_nothing() {
        let host = ten_file_host().failing_path("b");
        let snapshot = TreeCrawler::new(&host)
            .crawl(REPO, &CrawlOptions::new(py_only(), 50))
            .await
            .unwrap();

        assert_eq!(snapshot.files.len(), 6);
        assert!(snapshot.files.iter().all(|f| !f.path.starts_with("b/")));
    }

    #[tokio::test]
    async fn test_failing_file_is_skipped() {
        let host = ten_file_host().failing_path("a/two.py");
        let snapshot = TreeCrawler::new(&host)
            .crawl(REPO, &CrawlOptions::new(py_only(), 50))
            .await
            .unwrap();

        assert_eq!(snapshot.files.len(), 9);
        assert!(!snapshot.files.iter().any(|f| f.path == "a/two.py"));
    }

    #[tokio::test]
    async fn test_failing_root_is_an_error() {
        let host = FakeSourceHost::new("octocat");
        let result = TreeCrawler::new(&host)
            .crawl("octocat/missing", &CrawlOptions::new(py_only(), 5))
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_content_is_sampled() {
        let long = "x".repeat(12_000);
        let host = FakeSourceHost::new("octocat")
            .with_repo("notebooks")
            .with_file(REPO, "big.py", &long);

        let snapshot = TreeCrawler::new(&host)
            .crawl(REPO, &CrawlOptions::new(py_only(), 5))
            .await
            .unwrap();

        let node = &snapshot.files[0];
        assert!(node.truncated);
        assert!(node
            .content
            .as_deref()
            .unwrap()
            .ends_with("... [Content truncated - file is 12000 characters total]"));
        assert_eq!(node.extension, ".py");
        assert_eq!(node.size_bytes, 12_000);
    }

    #[test]
    fn test_normalize_extensions() {
        let exts = normalize_extensions(Some(&["PY".to_string(), ".Md".to_string(), " ".to_string()]));
        assert_eq!(exts.len(), 2);
        assert!(exts.contains(".py"));
        assert!(exts.contains(".md"));

        let defaults = normalize_extensions(None);
        assert!(defaults.contains(".ipynb"));
        assert!(defaults.contains(".py"));
    }
}
