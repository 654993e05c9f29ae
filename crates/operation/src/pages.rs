use crate::{
    ExecutionContext,
    engine::{self, Endpoint},
};
use pdfops_io::{FileRef, media_type::PDF};
use pdfops_options::{PageActions, Validate as _};
use pdfops_types::Result;

const ENDPOINT: Endpoint = Endpoint {
    name: "page manipulation",
    path: "pagemanipulation",
    accepts: &[PDF],
};

/// Rotates and deletes pages of a PDF, in the order the actions were added.
#[derive(Debug)]
pub struct PageManipulation {
    actions: PageActions,
    input: Option<FileRef>,
}

impl PageManipulation {
    #[must_use]
    pub fn create_new(actions: PageActions) -> Self {
        Self {
            actions,
            input: None,
        }
    }

    pub fn set_input(&mut self, input: FileRef) {
        self.input = Some(input);
    }

    /// # Errors
    ///
    /// See [`crate::CompressPdf::execute`].
    pub async fn execute(self, ctx: &ExecutionContext) -> Result<FileRef> {
        let mut input = engine::take_input(&ENDPOINT, self.actions.violations(), self.input, false)?;
        engine::run_single(ctx, &ENDPOINT, &self.actions, &mut input, PDF).await
    }
}
