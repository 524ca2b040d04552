//! Web-server rule writer (stage 2)
//!
//! Emits the fixed Apache rewrite rules into `public/.htaccess` in the build
//! tree. No parameters, no computation.

use std::fs;
use std::path::Path;

use crate::console;
use crate::error::DeployResult;

/// Apache front-controller rewrite rules.
pub const REWRITE_RULES: &str = r#"DirectoryIndex index.php

<IfModule mod_negotiation.c>
    Options -MultiViews
</IfModule>

<IfModule mod_rewrite.c>
    RewriteEngine On

    RewriteCond %{REQUEST_URI}::$0 ^(/.+)/(.*)::\2$
    RewriteRule .* - [E=BASE:%1]

    RewriteCond %{HTTP:Authorization} .+
    RewriteRule ^ - [E=HTTP_AUTHORIZATION:%0]

    RewriteCond %{ENV:REDIRECT_STATUS} =""
    RewriteRule ^index\.php(?:/(.*)|$) %{ENV:BASE}/$1 [R=301,L]

    RewriteCond %{REQUEST_FILENAME} !-f
    RewriteRule ^ %{ENV:BASE}/index.php [L]
</IfModule>

<IfModule !mod_rewrite.c>
    <IfModule mod_alias.c>
        RedirectMatch 307 ^/$ /index.php/
    </IfModule>
</IfModule>
"#;

/// Write the rewrite rules into `public/.htaccess` under the build tree.
pub fn write_rewrite_rules(build_dir: &Path) -> DeployResult<()> {
    let public = build_dir.join("public");
    fs::create_dir_all(&public)?;
    fs::write(public.join(".htaccess"), REWRITE_RULES)?;
    console::status("✅ .htaccess written");
    Ok(())
}
