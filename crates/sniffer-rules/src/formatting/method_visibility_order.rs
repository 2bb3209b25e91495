//! Methods ordered public, then protected, then private

use sniffer_core::{Pass, Scope, ScopeKind, ScopedRule, TokenKind, Visibility};

/// Visibilities allowed after the lowest one seen so far
fn allowed_after(lowest: Visibility) -> &'static [Visibility] {
    match lowest {
        Visibility::Public => &[Visibility::Public, Visibility::Protected, Visibility::Private],
        Visibility::Protected => &[Visibility::Protected, Visibility::Private],
        Visibility::Private => &[Visibility::Private],
    }
}

pub struct MethodVisibilityOrder;

impl ScopedRule for MethodVisibilityOrder {
    /// Lowest visibility seen in the current class
    type State = Option<Visibility>;

    fn name(&self) -> &'static str {
        "method_visibility_order"
    }

    fn code(&self) -> &'static str {
        "Symfony.Formatting.MethodVisibilityOrder"
    }

    fn description(&self) -> &'static str {
        "Declare public methods first, then protected ones and finally private ones"
    }

    fn scope_kinds(&self) -> &'static [ScopeKind] {
        &[ScopeKind::Class]
    }

    fn listen(&self) -> &'static [TokenKind] {
        &[TokenKind::Function]
    }

    fn process_within_scope(
        &self,
        pass: &mut Pass<'_>,
        ptr: usize,
        _scope: &Scope,
        lowest: &mut Option<Visibility>,
    ) -> Option<usize> {
        let visibility = pass.tokens.method_properties(ptr).visibility;

        match *lowest {
            Some(current) if !allowed_after(current).contains(&visibility) => {
                pass.add_error(
                    "Methods must be ordered public, protected, private",
                    ptr,
                    "OrderMethodsByVisibility",
                );
            }
            _ => *lowest = Some(visibility),
        }

        pass.tokens.declaration_end(ptr)
    }
}
