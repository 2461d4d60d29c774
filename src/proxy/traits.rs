//! Common traits for admin API resource clients

use super::ProxyClient;

/// A group of endpoints living under `/<app-path>/<version>`
///
/// Implementors only name their app path; the version always comes from the
/// `ProxyClient` they were built with.
pub trait ApiApplication {
    /// App path without leading slash, e.g. `admin/vclusters`
    const APP_PATH: &'static str;

    /// Proxy client this resource sends requests through
    fn proxy(&self) -> &ProxyClient;

    /// Path prefix for every request of this resource
    fn base_path(&self) -> String {
        format!("/{}/{}", Self::APP_PATH, self.proxy().version())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proxy::ApiClient;

    struct TestApp<'a> {
        proxy: &'a ProxyClient,
    }

    impl ApiApplication for TestApp<'_> {
        const APP_PATH: &'static str = "admin/test";

        fn proxy(&self) -> &ProxyClient {
            self.proxy
        }
    }

    #[test]
    fn test_base_path_uses_proxy_version() {
        let proxy = ProxyClient::new(ApiClient::test_client("http://gw"), "v2");
        let app = TestApp { proxy: &proxy };
        assert_eq!(app.base_path(), "/admin/test/v2");
    }

    #[test]
    fn test_two_proxies_keep_independent_versions() {
        let v1 = ProxyClient::new(ApiClient::test_client("http://gw"), "v1");
        let beta = ProxyClient::new(ApiClient::test_client("http://gw"), "v1beta1");
        assert_eq!(TestApp { proxy: &v1 }.base_path(), "/admin/test/v1");
        assert_eq!(TestApp { proxy: &beta }.base_path(), "/admin/test/v1beta1");
    }
}
