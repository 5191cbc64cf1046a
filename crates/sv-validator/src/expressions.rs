use crate::*;

pub(crate) fn parse_expression_at(
    source: &str,
    path: &DocPath,
    limits: ExprLimits,
) -> Result<Expr, StorylineError> {
    parse_expression_with_limits(source, limits).map_err(|error| error.with_path(path))
}

pub(crate) fn optional_expression(
    object: &JsonObject,
    property: &str,
    path: &DocPath,
    kind: ErrorKind,
    limits: ExprLimits,
) -> Result<Option<Expr>, StorylineError> {
    let Some(source) = optional_str(object, property, path, kind)? else {
        return Ok(None);
    };
    parse_expression_at(source, &path.key(property), limits).map(Some)
}
