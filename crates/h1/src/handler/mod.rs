//! Request handlers
//!
//! A [`Handler`] turns one decoded [`Request`] into a [`Response`]. Async
//! functions and closures become handlers through [`make_handler`].
//!
//! [`LocalHandler`] is the same trait without the `Send` bound on the returned
//! future; every [`Handler`] is also a [`LocalHandler`].

use std::future::Future;

use crate::protocol::{Request, Response};

#[trait_variant::make(Handler: Send)]
pub trait LocalHandler {
    async fn call(&self, req: Request) -> Response;
}

#[derive(Debug)]
pub struct HandlerFn<F> {
    f: F,
}

impl<F, Fut> Handler for HandlerFn<F>
where
    F: Fn(Request) -> Fut + Send + Sync,
    Fut: Future<Output = Response> + Send,
{
    async fn call(&self, req: Request) -> Response {
        (self.f)(req).await
    }
}

pub fn make_handler<F, Ret>(f: F) -> HandlerFn<F>
where
    F: Fn(Request) -> Ret,
    Ret: Future<Output = Response>,
{
    HandlerFn { f }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::RequestDecoder;
    use http::StatusCode;

    async fn echo_target(req: Request) -> Response {
        Response::new(StatusCode::OK, req.target().to_owned())
    }

    #[tokio::test]
    async fn function_handler() {
        let request = RequestDecoder::new().feed(b"GET /coffee HTTP/1.1\r\n\r\n").unwrap().unwrap();
        let handler = make_handler(echo_target);

        let response = Handler::call(&handler, request).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(&response.body()[..], b"/coffee");
    }
}
